#!/usr/bin/env rust-script
//! Test corpus conversion validation
//!
//! Converts one HTML file, or every `.html` file in a directory, and reports
//! files whose output breaks the blank-line or trimming guarantees.
//!
//! ```cargo
//! [dependencies]
//! html2org = { path = "../.." }
//! ```

use html2org::{OrgConverter, parse_html};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <html_file_or_directory>", args[0]);
        process::exit(1);
    }

    let target = Path::new(&args[1]);
    let files = match collect_files(target) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error reading {}: {}", target.display(), e);
            process::exit(1);
        }
    };

    let converter = OrgConverter::new();
    let single = files.len() == 1 && target.is_file();
    let mut failures = 0;

    for file in &files {
        let html = match fs::read(file) {
            Ok(content) => String::from_utf8_lossy(&content).into_owned(),
            Err(e) => {
                eprintln!("Error reading file {}: {}", file.display(), e);
                failures += 1;
                continue;
            }
        };

        let dom = parse_html(&html);
        let org = match converter.convert(&dom) {
            Ok(org) => org,
            Err(e) => {
                eprintln!("{}: conversion failed: {}", file.display(), e);
                failures += 1;
                continue;
            }
        };

        if single {
            println!("{}", org);
            continue;
        }

        if org.contains("\n\n\n") || org.trim_end() != org {
            eprintln!("{}: output is not normalized", file.display());
            failures += 1;
        } else {
            println!("{}: ok ({} bytes)", file.display(), org.len());
        }
    }

    if failures > 0 {
        eprintln!("{} of {} files failed", failures, files.len());
        process::exit(1);
    }
}

fn collect_files(target: &Path) -> std::io::Result<Vec<PathBuf>> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = fs::read_dir(target)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "html"))
        .collect();
    files.sort();
    Ok(files)
}
