use std::env;
use std::path::PathBuf;

use datasynth_generate::output::{ExportFormat, export_to_path};
use datasynth_generate::{
    EntityGenerator, EntityKind, EntityRequest, GenerateOptions, GenerationEngine,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut kind = EntityKind::Customer;
    let mut count: u64 = 100;
    let mut out: Option<PathBuf> = None;
    let mut seed: Option<u64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--entity" => kind = args.next().ok_or("missing --entity value")?.parse()?,
            "--count" => count = args.next().ok_or("missing --count value")?.parse()?,
            "--seed" => seed = Some(args.next().ok_or("missing --seed value")?.parse()?),
            "--out" => out = args.next().map(PathBuf::from),
            _ => return Err(format!("unexpected argument '{arg}'").into()),
        }
    }

    let out = out.unwrap_or_else(|| PathBuf::from(format!("{}.csv", kind.default_table())));
    let engine = GenerationEngine::new(GenerateOptions {
        seed,
        ..GenerateOptions::default()
    });
    let fields = kind.generator().field_names();
    let result = engine.generate(kind, &EntityRequest::new(count, fields), None)?;
    let bytes = export_to_path(&result.records, &out, ExportFormat::Csv)?;

    println!("wrote {} rows ({bytes} bytes) to {}", result.records.len(), out.display());
    Ok(())
}
