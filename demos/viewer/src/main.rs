use anyhow::Context;
use glass_logo::LogoConfig;

/// Opens the logo in a window. An optional argument names a JSON config file.
fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Cannot read {}", path))?;
            LogoConfig::from_json(&json)?
        }
        None => LogoConfig::default(),
    };
    glass_logo::run(config)
}
