//! Композиция мира: конфигурация, карта высот, тайловая сетка
//!
//! `WorldGrid` владеет всеми данными одной генерации и оркестрирует
//! полный проход: шум → классификация → реки. Повторная генерация
//! заменяет карту высот и тайловую сетку целиком; инкрементального
//! пути обновления нет.

use crate::config::{GenerationConfig, seed_from_str};
use crate::grid::Grid;
use crate::heightmap::generate_elevation;
use crate::rivers::{RiverStats, carve_rivers};
use crate::tile::{TileType, classify};
use image::{ImageBuffer, Rgba};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub struct WorldGrid {
    config: GenerationConfig,
    elevation: Grid<f32>,
    tiles: Grid<TileType>,
}

impl WorldGrid {
    /// Создаёт мир с пустыми сетками; генерация запускается явно
    /// через [`WorldGrid::regenerate`].
    #[must_use]
    pub fn new(config: GenerationConfig) -> Self {
        let elevation = Grid::new(config.width, config.height, 0.0);
        let tiles = Grid::new(config.width, config.height, TileType::Empty);
        Self {
            config,
            elevation,
            tiles,
        }
    }

    /// Полный проход генерации: карта высот из текущего сида, классификация
    /// всех клеток, затем прокладка рек.
    ///
    /// Источник случайных чисел рек пересевается сохранённым сидом при
    /// каждом вызове, поэтому одинаковые сид и конфигурация дают
    /// бит-идентичный результат. Старые сетки остаются доступными до
    /// конца прохода и заменяются разом.
    pub fn regenerate(&mut self) -> RiverStats {
        let width = self.config.width;
        let height = self.config.height;

        let elevation = generate_elevation(self.config.seed, &self.config.noise, width, height);

        let classify_cell = |i: usize| -> TileType {
            let y = i as u32 / width;
            classify(elevation.data[i], y, height, &self.config)
        };

        #[cfg(feature = "parallel")]
        let data: Vec<TileType> = (0..elevation.data.len())
            .into_par_iter()
            .map(classify_cell)
            .collect();

        #[cfg(not(feature = "parallel"))]
        let data: Vec<TileType> = (0..elevation.data.len()).map(classify_cell).collect();

        let mut tiles = Grid {
            width,
            height,
            data,
        };

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let stats = carve_rivers(&mut tiles, &elevation, &self.config, &mut rng);

        self.elevation = elevation;
        self.tiles = tiles;
        stats
    }

    /// Меняет сохранённый сид; генерацию не запускает
    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = seed;
    }

    /// Сид из произвольной строки (детерминированный FNV-1a)
    pub fn set_seed_str(&mut self, seed: &str) {
        self.config.seed = seed_from_str(seed);
    }

    /// Случайный сид; генерацию не запускает
    pub fn randomize_seed(&mut self) {
        self.config.seed = rand::random();
    }

    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    #[must_use]
    pub fn elevation(&self) -> &Grid<f32> {
        &self.elevation
    }

    #[must_use]
    pub fn tiles(&self) -> &Grid<TileType> {
        &self.tiles
    }

    /// Растр width×height: цвет каждой клетки по палитре,
    /// `Empty` — цветом ошибки
    #[must_use]
    pub fn color_raster(&self) -> Vec<[u8; 3]> {
        self.tiles
            .data
            .iter()
            .map(|&tile| self.config.palette.color(tile))
            .collect()
    }

    /// RGBA-буфер для кодирования в файл на стороне хоста
    #[must_use]
    pub fn to_rgba_image(&self) -> Vec<u8> {
        self.tiles
            .data
            .iter()
            .flat_map(|&tile| {
                let rgb = self.config.palette.color(tile);
                [rgb[0], rgb[1], rgb[2], 255]
            })
            .collect()
    }

    pub fn save_as_png(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.config.width, self.config.height, self.to_rgba_image())
                .ok_or("Failed to create image buffer")?;
        img.save(path)?;
        Ok(())
    }
}
