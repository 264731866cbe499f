use glimpse_compose::{compose, install_bridges, FileMap};
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: glimpse-compose [--instrument] [--bridges] [--out FILE] <file>...");
        eprintln!();
        eprintln!("Composes project files into one standalone HTML document.");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  glimpse-compose index.html style.css script.js");
        eprintln!("  glimpse-compose --instrument --out preview.html index.html");
        process::exit(1);
    }

    let mut instrument = false;
    let mut bridges = false;
    let mut out: Option<String> = None;
    let mut files = FileMap::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--instrument" => instrument = true,
            "--bridges" => bridges = true,
            "--out" => {
                i += 1;
                match args.get(i) {
                    Some(path) => out = Some(path.clone()),
                    None => {
                        eprintln!("--out requires a file argument");
                        process::exit(1);
                    }
                }
            }
            path => {
                let content = match fs::read_to_string(path) {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("✗ failed to read {}: {}", path, e);
                        process::exit(1);
                    }
                };
                // Keyed by file name so on-disk layout maps onto the
                // composer's alias resolution.
                let name = Path::new(path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string());
                files.insert(name, content);
            }
        }
        i += 1;
    }

    if files.is_empty() {
        eprintln!("✗ no input files");
        process::exit(1);
    }

    let doc = compose(&files, instrument);
    let html = if bridges {
        install_bridges(&doc, instrument)
    } else {
        doc.html
    };

    match out {
        Some(path) => {
            if let Err(e) = fs::write(&path, html) {
                eprintln!("✗ failed to write {}: {}", path, e);
                process::exit(1);
            }
            println!("✓ wrote {}", path);
        }
        None => print!("{}", html),
    }
}
