//! Builds a small sample tree, prints it and walks it by name and by id.

use std::io::{self, Write};

use anyhow::anyhow;
use clap::Parser;
use mydir_mds::{Directory, Entry, Version};

mod dump;

const SEPARATOR: &str = "=====";

#[derive(Debug, Parser)]
#[command(name = "mydir", version, about = "In-memory metadata tree demo")]
struct Cli {
    /// Print the final tree as json
    #[arg(long)]
    json: bool,

    /// Log filter, overrides RUST_LOG (e.g. `debug` or `mydir_mds=debug`)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level.as_deref());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let france = Directory::new_root("France");

    let pants = france.new_file("Pants")?;
    let pants_v1 = pants.new_version()?;
    writeln!(out, "{}", pants_v1.id())?;
    let pants_v2 = pants.new_version()?;
    writeln!(out, "{}", pants_v2.id())?;

    let chance = france
        .new_directory("Plants")?
        .new_directory("Prance")?
        .new_directory("Chance")?;

    let trance = chance.new_file("Trance")?;
    let trance_v1 = trance.new_version()?;
    writeln!(out, "{}", trance_v1.id())?;
    let trance_v2 = trance.new_version()?;
    writeln!(out, "{}", trance_v2.id())?;

    writeln!(out, "{}", SEPARATOR)?;
    dump::directory(&mut out, &france, 0)?;

    writeln!(out, "{}", SEPARATOR)?;
    trance_v1.delete()?;
    log::info!("Deleted version {} of {}", trance_v1.id(), trance.name());
    dump::directory(&mut out, &france, 0)?;

    writeln!(out, "{}", SEPARATOR)?;
    match france.get_by_name("Pants")? {
        Entry::Directory(directory) => dump::directory(&mut out, &directory, 10)?,
        Entry::File(file) => dump::file(&mut out, &file, 10)?,
    }

    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "Trance: {:?}", chance.get_file_by_uuid(trance.id()))?;
    writeln!(out, "Chance: {:?}", chance.get_directory_by_uuid(chance.id()))?;
    writeln!(out, "PantsV2: {:?}", chance.get_version_by_uuid(pants_v2.id()))?;
    writeln!(out, "TranceV1: {:?}", chance.get_version_by_uuid(trance_v1.id()))?;

    writeln!(out, "{}", SEPARATOR)?;
    dump::directory(&mut out, &owning_directory(&chance, &pants_v2)?, 0)?;

    writeln!(out, "{}", SEPARATOR)?;
    dump::directory(&mut out, &owning_directory(&chance, &trance_v2)?, 0)?;

    if cli.json {
        writeln!(out, "{}", SEPARATOR)?;
        writeln!(out, "{}", france.snapshot().to_json()?)?;
    }
    Ok(())
}

/// Find the version by id from `from`, then walk up to the directory holding its file
fn owning_directory(from: &Directory, version: &Version) -> anyhow::Result<Directory> {
    from.get_version_by_uuid(version.id())
        .and_then(|version| version.file())
        .and_then(|file| file.directory())
        .ok_or_else(|| anyhow!("No directory owns version {}", version.id()))
}

fn init_logger(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.init();
}
