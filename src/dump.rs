use std::io::{self, Write};

use mydir_mds::{Directory, File, Version};

/// Print a directory and everything below it, one entry per line.
/// Each level of depth adds one `.` to the line prefix. Children are printed in name order.
pub fn directory(out: &mut impl Write, directory: &Directory, level: usize) -> io::Result<()> {
    writeln!(
        out,
        "{} D[{}] {}",
        ".".repeat(level),
        directory.id(),
        directory.name()
    )?;

    let mut children = directory.directories();
    children.sort_by_key(Directory::name);
    for child in &children {
        self::directory(out, child, level + 1)?;
    }

    let mut files = directory.files();
    files.sort_by_key(File::name);
    for child in &files {
        file(out, child, level + 1)?;
    }
    Ok(())
}

/// Print a file and its versions
pub fn file(out: &mut impl Write, file: &File, level: usize) -> io::Result<()> {
    writeln!(out, "{} F[{}] {}", ".".repeat(level), file.id(), file.name())?;
    for child in file.versions() {
        version(out, &child, level + 1)?;
    }
    Ok(())
}

pub fn version(out: &mut impl Write, version: &Version, level: usize) -> io::Result<()> {
    let owner = version
        .file()
        .map(|file| file.name())
        .unwrap_or_else(|| String::from("<deleted>"));
    writeln!(
        out,
        "{} V[{}] version of {}",
        ".".repeat(level),
        version.id(),
        owner
    )
}

#[cfg(test)]
mod dump_tests {
    use mydir_mds::Directory;

    #[test]
    fn dump_tree() {
        let root = Directory::new_root("France");
        let pants = root.new_file("Pants").unwrap();
        let version = pants.new_version().unwrap();
        let plants = root.new_directory("Plants").unwrap();

        let mut out = Vec::new();
        super::directory(&mut out, &root, 0).unwrap();
        let out = String::from_utf8(out).unwrap();

        let expected = format!(
            " D[{}] France\n. D[{}] Plants\n. F[{}] Pants\n.. V[{}] version of Pants\n",
            root.id(),
            plants.id(),
            pants.id(),
            version.id()
        );
        assert_eq!(expected, out);
    }

    #[test]
    fn dump_file_at_depth() {
        let root = Directory::new_root("root");
        let file = root.new_file("file").unwrap();

        let mut out = Vec::new();
        super::file(&mut out, &file, 10).unwrap();

        assert_eq!(
            format!(".......... F[{}] file\n", file.id()),
            String::from_utf8(out).unwrap()
        );
    }
}
