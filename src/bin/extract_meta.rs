//! CLI tool: extract title and abstract from an academic PDF

use paper_meta::{extract_meta, MetaError};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file> [--json]", args[0]);
        eprintln!();
        eprintln!("Extracts the paper title and abstract from the first page.");
        process::exit(1);
    }

    let pdf_path = &args[1];
    let json_output = args.get(2).map(|a| a == "--json").unwrap_or(false);

    match extract_meta(pdf_path) {
        Ok(meta) => {
            if json_output {
                println!(
                    r#"{{"title":"{}","abstract":"{}"}}"#,
                    escape_json(&meta.title),
                    escape_json(&meta.abstract_text)
                );
            } else {
                println!("Title:    {}", meta.title);
                if meta.abstract_text.is_empty() {
                    println!("Abstract: (not found)");
                } else {
                    println!("Abstract: {}", meta.abstract_text);
                }
            }
        }
        Err(MetaError::NoTitleCandidate) => {
            eprintln!("No title candidate found in {}", pdf_path);
            process::exit(2);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}
