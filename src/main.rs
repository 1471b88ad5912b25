//! CLI for storage2md - storage-format to Markdown converter

use clap::Parser;
use std::path::PathBuf;
use storage2md::{ConvertOptions, Language, PageBundle, StorageToMarkdown};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file: a page bundle JSON ({"page": ..., "comments": [...]})
    input: PathBuf,

    /// Output file path (optional, prints to stdout if not specified)
    output: Option<PathBuf>,

    /// Treat the input as a raw storage-format body instead of a page bundle
    #[arg(long)]
    fragment: bool,

    /// Write the full conversion result (metadata + content) as JSON
    #[arg(long, conflicts_with = "fragment")]
    json: bool,

    /// Base URL that relative page links are resolved against
    #[arg(long, default_value = "")]
    base_url: String,

    /// Language for labels and placeholders (en, zh)
    #[arg(long, default_value = "en")]
    lang: String,

    /// Leave comments out of the output
    #[arg(long)]
    no_comments: bool,
}

fn run(args: Args) -> storage2md::Result<String> {
    let language = Language::from_tag(&args.lang).unwrap_or_else(|| {
        tracing::warn!(lang = %args.lang, "unknown language, falling back to English");
        Language::English
    });

    let converter = StorageToMarkdown::new(ConvertOptions {
        base_url: args.base_url,
        language,
        include_comments: !args.no_comments,
    });

    let input = std::fs::read_to_string(&args.input)?;
    if args.fragment {
        return Ok(converter.render_fragment(&input));
    }

    let bundle = PageBundle::from_json(&input)?;
    let result = converter.convert(&bundle.page, &bundle.comments)?;
    if args.json {
        result.to_json()
    } else {
        Ok(result.content)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let output = args.output.clone();

    match run(args) {
        Ok(markdown) => {
            if let Some(output) = output {
                if let Err(e) = std::fs::write(&output, &markdown) {
                    eprintln!("Error writing output: {}", e);
                    std::process::exit(1);
                }
                println!("Successfully converted to {:?}", output);
            } else {
                println!("{}", markdown);
            }
        }
        Err(e) => {
            eprintln!("Error converting page: {}", e);
            std::process::exit(1);
        }
    }
}
