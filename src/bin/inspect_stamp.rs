use formstamp::pdf::read_stamped_text;
use lopdf::{Document, Object};
use std::env;
use std::fs;

fn dump_stream(obj: &Object) {
    match obj {
        Object::Stream(s) => match s.decompressed_content() {
            Ok(bytes) => println!(
                "--- stream text start ---\n{}\n--- stream text end ---",
                String::from_utf8_lossy(&bytes)
            ),
            Err(_) => {
                let preview_len = std::cmp::min(s.content.len(), 256);
                println!(
                    "raw content ({} bytes, filter {:?}): {}",
                    s.content.len(),
                    s.dict.get(b"Filter").ok(),
                    String::from_utf8_lossy(&s.content[..preview_len])
                );
            }
        },
        _ => println!("not a stream: {:?}", obj),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: inspect_stamp <stamped.pdf> [--raw]");
        std::process::exit(2);
    }
    let bytes = match fs::read(&args[1]) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("failed to read {}: {}", args[1], e);
            std::process::exit(1)
        }
    };
    let doc = match Document::load_mem(&bytes) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("failed to load: {:?}", e);
            std::process::exit(1)
        }
    };

    let pages = doc.get_pages();
    println!("PDF version: {}", doc.version);
    println!("Pages: {}", pages.len());

    if let Some(page_id) = pages.values().next() {
        if let Ok(page) = doc.get_dictionary(*page_id) {
            match page.get(b"Contents") {
                Ok(Object::Array(items)) => println!("First page content streams: {}", items.len()),
                Ok(Object::Reference(_)) => println!("First page content streams: 1"),
                _ => println!("First page has no content"),
            }
            if args.iter().any(|a| a == "--raw") {
                let last = match page.get(b"Contents") {
                    Ok(Object::Array(items)) => items.last().and_then(|o| o.as_reference().ok()),
                    Ok(Object::Reference(id)) => Some(*id),
                    _ => None,
                };
                if let Some(obj) = last.and_then(|id| doc.get_object(id).ok()) {
                    dump_stream(obj);
                }
            }
        }
    }

    match read_stamped_text(&bytes) {
        Ok(drawn) if drawn.is_empty() => println!("No stamped text found"),
        Ok(drawn) => {
            println!("{} stamped strings:", drawn.len());
            println!("{:>8} {:>8} {:>6}  text", "x", "y", "size");
            for d in drawn {
                println!("{:>8.2} {:>8.2} {:>6.1}  {}", d.x, d.y, d.size, d.text);
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1)
        }
    }
}
