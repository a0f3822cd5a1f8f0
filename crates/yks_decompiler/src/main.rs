use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;

use yuka_core::format::ykc::{Archive, SaveMode};
use yuka_core::format::yks::{Assembler, Disassembler};
use yuka_core::script::{Compiler, Decompiler, Script, StringTable};
use yuka_core::YukaConfig;
use yuka_nls::Encoding;

#[derive(ClapParser, Debug)]
#[command(version, about = "Yuka YKS script decompiler")]
struct Args {
    /// A .yks file, or a .ykc archive together with --entry.
    #[arg(short, long)]
    input: PathBuf,

    /// Script name inside the archive given as --input.
    #[arg(short, long)]
    entry: Option<String>,

    #[arg(short, long)]
    output: PathBuf,

    /// YAML settings file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the text encoding from the settings file.
    #[arg(short, long)]
    lang: Option<Encoding>,

    /// Also write the raw instruction listing next to the output.
    #[arg(long)]
    listing: bool,

    /// Recompile the result and compare it with the input.
    #[arg(long)]
    check: bool,
}

fn load_input(args: &Args, config: &YukaConfig) -> Result<Vec<u8>> {
    match &args.entry {
        Some(entry) => {
            let archive = Archive::open(&args.input, SaveMode::ReadOnly, config)
                .with_context(|| format!("open archive {}", args.input.display()))?;
            let bytes = archive.read_all(entry)?;
            Ok(bytes)
        }
        None => fs::read(&args.input).with_context(|| format!("read {}", args.input.display())),
    }
}

fn sibling(output: &Path, extension: &str) -> PathBuf {
    output.with_extension(extension)
}

fn check_roundtrip(bytes: &[u8], script: &Script, config: &YukaConfig) -> Result<()> {
    let mut list = Compiler::new(config)
        .with_strings(&script.strings)
        .compile(&script.statements)?;
    let rebuilt = Assembler::new(config).assemble(&mut list)?;

    let original = Disassembler::new(config).disassemble(bytes)?;
    let again = Disassembler::new(config).disassemble(&rebuilt)?;
    let decompiler = Decompiler::new(config)?;
    let a = decompiler.decompile(&original, Some(&mut StringTable::new()))?;
    let b = decompiler.decompile(&again, Some(&mut StringTable::new()))?;
    if a != b {
        bail!("recompiled script decompiles differently");
    }
    if rebuilt.as_slice() != bytes {
        log::info!("recompiled script is equivalent but not byte-identical");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => YukaConfig::load(path)?,
        None => YukaConfig::default(),
    };
    if let Some(lang) = args.lang {
        config.nls = lang;
    }

    let bytes = load_input(&args, &config)?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if args.listing {
        let list = Disassembler::new(&config).disassemble(&bytes)?;
        fs::write(sibling(&args.output, "lst"), list.listing())?;
    }

    let script = Script::from_bytes(&bytes, &config)?;
    fs::write(&args.output, script.to_text())
        .with_context(|| format!("write {}", args.output.display()))?;

    if !script.strings.is_empty() {
        let yaml = serde_yaml::to_string(&script.strings)?;
        fs::write(sibling(&args.output, "yaml"), yaml)?;
    }

    if args.check {
        check_roundtrip(&bytes, &script, &config)?;
        log::info!("round trip ok");
    }
    Ok(())
}
