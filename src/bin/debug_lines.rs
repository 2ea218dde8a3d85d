//! Debug tool: dump every first-page line with its derived geometry
//!
//! Usage: debug_lines <pdf_file>
//!
//! Prints height, width, and upper_space per line in reading order, which is
//! the raw input the title and abstract heuristics rank on.

use paper_meta::{extract_lines, pdf};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file>", args[0]);
        eprintln!();
        eprintln!("Prints geometry for every text line on the first page.");
        process::exit(1);
    }

    let page = match pdf::first_page_layout(&args[1]) {
        Ok(page) => page,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let lines = extract_lines(&page);
    if lines.is_empty() {
        eprintln!("No text lines found on the first page.");
        process::exit(0);
    }

    println!("{:>4} {:>8} {:>8} {:>8}  text", "idx", "height", "width", "upspace");
    for line in &lines {
        println!(
            "{:>4} {:>8.3} {:>8.3} {:>8.2}  {:?}",
            line.index, line.height, line.width, line.upper_space, line.text
        );
    }
}
