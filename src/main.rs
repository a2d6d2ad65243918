use std::{env, fs, path::PathBuf, process::ExitCode};

use doc_association::{AssociationConfig, AssociationEngine, AssociationError, SimpleTokenizer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

struct Args {
    files: Vec<PathBuf>,
    config: Option<PathBuf>,
    snapshot: Option<PathBuf>,
}

fn usage() -> &'static str {
    "usage: doc-association [--config <file.toml>] [--snapshot <out.cbor>] <post>..."
}

fn parse_args() -> Result<Args, String> {
    let mut files = Vec::new();
    let mut config = None;
    let mut snapshot = None;
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => config = Some(it.next().ok_or("--config needs a path")?.into()),
            "--snapshot" => snapshot = Some(it.next().ok_or("--snapshot needs a path")?.into()),
            "-h" | "--help" => return Err(usage().to_string()),
            _ => files.push(PathBuf::from(arg)),
        }
    }
    if files.is_empty() {
        return Err(usage().to_string());
    }
    Ok(Args { files, config, snapshot })
}

fn load_config(path: Option<&PathBuf>) -> Result<AssociationConfig, AssociationError> {
    match path {
        Some(path) => {
            let src = fs::read_to_string(path)
                .map_err(|e| AssociationError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
            AssociationConfig::from_toml_str(&src)
        }
        None => Ok(AssociationConfig::default()),
    }
}

fn run(args: Args) -> Result<(), AssociationError> {
    let config = load_config(args.config.as_ref())?;
    let engine = AssociationEngine::with_config(config)?;
    let tokenizer = SimpleTokenizer::default();

    let mut names = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                error!(path = %path.display(), error = %e, "skipping unreadable post");
                continue;
            }
        };
        let report = engine.publish(&text, &tokenizer)?;
        info!(path = %path.display(), document = %report.document, relations = report.relations_created, "post ingested");
        names.push((report.document, path.display().to_string()));
    }

    for (id, name) in &names {
        let related = engine.related_documents(*id)?;
        println!("{} ({})", name, id);
        if related.is_empty() {
            println!("    no related posts");
            continue;
        }
        for (target, score) in related.iter() {
            let target_name = names
                .iter()
                .find(|(doc, _)| doc == target)
                .map_or("?", |(_, n)| n.as_str());
            println!("    -> {} ({}) association {}", target_name, target, score);
        }
    }

    let words = engine.related_words();
    if !words.is_empty() {
        println!("related words:");
        for pair in &words {
            println!("    {} ~ {} (r = {:.3})", pair.a, pair.b, pair.r);
        }
    }

    if let Some(path) = &args.snapshot {
        let bytes = engine.snapshot()?.to_cbor()?;
        fs::write(path, bytes)
            .map_err(|e| AssociationError::Snapshot(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "snapshot written");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "association run failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
