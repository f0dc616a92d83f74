use clap::Parser;
use std::path::PathBuf;
use tilegen::{GenerationConfig, WorldGrid, seed_from_str};

/// Генератор тороидальных тайловых миров
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Строковый сид (перекрывает сид из конфигурации)
    #[arg(short, long)]
    seed: Option<String>,

    /// Путь для сохранения карты тайлов (по умолчанию: ./world.png)
    #[arg(short, long, default_value = "world.png")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GenerationConfig::from_toml_file(path.to_str().ok_or("bad config path")?)?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = &cli.seed {
        config.seed = seed_from_str(seed);
    }

    println!(
        "Генерация мира {}×{}, сид {}...",
        config.width, config.height, config.seed
    );
    let mut world = WorldGrid::new(config);
    let stats = world.regenerate();
    println!(
        "Проложено рек: {} (попыток: {})",
        stats.made, stats.attempted
    );

    println!("Сохранение в {:?}", cli.output);
    world.save_as_png(cli.output.to_str().ok_or("bad output path")?)?;

    println!("\nГотово! Карта тайлов сохранена.");
    Ok(())
}
