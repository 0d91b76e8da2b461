use datasynth_generate::ProviderRegistry;

fn main() {
    let registry = ProviderRegistry::new();
    for info in registry.catalog() {
        println!(
            "{:<28} {:<10} {}",
            info.signature,
            info.category.as_str(),
            info.description
        );
    }
}
