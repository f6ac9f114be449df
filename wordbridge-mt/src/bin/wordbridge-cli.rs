use clap::{Arg, Command};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wordbridge::{RawQuery, parse_query};
use wordbridge_mt::{
    ExpansionEngine, MockMode, MockPhonetics, MockSynonyms, MockTranslator, ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("wordbridge-cli")
        .version("0.1.0")
        .about("Translate words into several languages, with IPA and synonyms")
        .arg(
            Arg::new("input")
                .help("Comma-separated words to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output-lang")
                .help("Comma-separated target language codes (e.g., de,ru)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("source-lang")
                .long("source")
                .short('s')
                .help("Source language code (default: en)")
                .default_value("en"),
        )
        .arg(
            Arg::new("synonyms")
                .long("synonyms")
                .short('n')
                .help("Number of synonyms to translate per word and language")
                .default_value("0"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock providers instead of the real services")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log each upstream call")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let _ = dotenvy::dotenv();

    let verbose = matches.get_flag("verbose");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ServiceConfig::from_env();

    let raw = RawQuery {
        input: matches.get_one::<String>("input").cloned(),
        input_lang: matches.get_one::<String>("source-lang").cloned(),
        output_lang: matches.get_one::<String>("output-lang").cloned(),
        synonym_count: matches.get_one::<String>("synonyms").cloned(),
    };

    let request = match parse_query(&raw, &config.languages) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!(
                "   Supported languages: {}",
                config.languages.codes().collect::<Vec<_>>().join(", ")
            );
            return Err(e.into());
        }
    };

    let engine = if matches.get_flag("mock") {
        ExpansionEngine::in_memory(
            Arc::new(MockTranslator::new(MockMode::Suffix)),
            Arc::new(MockPhonetics::new()),
            Arc::new(MockSynonyms::sample()),
            config.cache_max_age,
        )
    } else {
        config.engine()?
    };

    if verbose {
        eprintln!("🔧 {:?}", engine);
    }

    let output = match engine.expand(&request).await {
        Ok(output) => output,
        Err(e) => {
            eprintln!("❌ {}", e);
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Log level used when `RUST_LOG` is not set
fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}
