//! Конфигурация генерации мира
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Настройки когерентного шума (октавы, период, персистентность, лакунарность)
//! - Пороги и отсечки классификации тайлов (море/пляж/лес/пустыня/лёд и т.д.)
//! - Ограничения генерации рек
//! - Палитру цветов тайлов для растрового вывода
//!
//! Все структуры поддерживают сериализацию в TOML для настройки через
//! конфигурационные файлы. Ядро генерации не валидирует порядок отсечек:
//! немонотонная конфигурация даёт согласованную, но, возможно,
//! неожиданную классификацию, а не ошибку.

use crate::tile::TileType;
use serde::{Deserialize, Serialize};
use std::fs;

/// Настройки когерентного шума для карты высот
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoiseSettings {
    /// Количество октав fBm (больше октав = больше мелких деталей)
    #[serde(default = "default_octaves")]
    pub octaves: usize,

    /// Период базовой волны в пикселях (больше = крупнее формы рельефа)
    #[serde(default = "default_period")]
    pub period: f32,

    /// Затухание амплитуды между октавами (0..1)
    #[serde(default = "default_persistence")]
    pub persistence: f32,

    /// Множитель частоты между октавами
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
}

fn default_octaves() -> usize {
    6
}
fn default_period() -> f32 {
    150.0
}
fn default_persistence() -> f32 {
    0.55
}
fn default_lacunarity() -> f32 {
    1.8
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            octaves: 6,
            period: 150.0,
            persistence: 0.55,
            lacunarity: 1.8,
        }
    }
}

/// Верхние границы высоты для базовых и переопределяющих зон.
///
/// Предусловие (не проверяется): deep_sea < sea < beach, ice_beach,
/// land, desert_land, ice_land < mountain ≤ snow, все в [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cutoffs {
    #[serde(default = "default_deep_sea_cutoff")]
    pub deep_sea: f32,
    #[serde(default = "default_sea_cutoff")]
    pub sea: f32,
    #[serde(default = "default_beach_cutoff")]
    pub beach: f32,
    #[serde(default = "default_ice_beach_cutoff")]
    pub ice_beach: f32,
    #[serde(default = "default_land_cutoff")]
    pub land: f32,
    #[serde(default = "default_desert_land_cutoff")]
    pub desert_land: f32,
    #[serde(default = "default_ice_land_cutoff")]
    pub ice_land: f32,
    #[serde(default = "default_mountain_cutoff")]
    pub mountain: f32,
    #[serde(default = "default_snow_cutoff")]
    pub snow: f32,
    #[serde(default = "default_forest_cutoff")]
    pub forest: f32,
}

fn default_deep_sea_cutoff() -> f32 {
    0.48
}
fn default_sea_cutoff() -> f32 {
    0.5
}
fn default_beach_cutoff() -> f32 {
    0.515
}
fn default_ice_beach_cutoff() -> f32 {
    0.508
}
fn default_land_cutoff() -> f32 {
    0.63
}
fn default_desert_land_cutoff() -> f32 {
    0.63
}
fn default_ice_land_cutoff() -> f32 {
    0.63
}
fn default_mountain_cutoff() -> f32 {
    0.67
}
fn default_snow_cutoff() -> f32 {
    1.0
}
fn default_forest_cutoff() -> f32 {
    0.62
}

impl Default for Cutoffs {
    fn default() -> Self {
        Self {
            deep_sea: 0.48,
            sea: 0.5,
            beach: 0.515,
            ice_beach: 0.508,
            land: 0.63,
            desert_land: 0.63,
            ice_land: 0.63,
            mountain: 0.67,
            snow: 1.0,
            forest: 0.62,
        }
    }
}

/// Нижние границы высоты, парные к отсечкам переопределений
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    #[serde(default = "default_forest_threshold")]
    pub forest: f32,
    #[serde(default = "default_ice_beach_threshold")]
    pub ice_beach: f32,
    #[serde(default = "default_desert_land_threshold")]
    pub desert_land: f32,
    #[serde(default = "default_ice_land_threshold")]
    pub ice_land: f32,
}

fn default_forest_threshold() -> f32 {
    0.56
}
fn default_ice_beach_threshold() -> f32 {
    0.5
}
fn default_desert_land_threshold() -> f32 {
    0.535
}
fn default_ice_land_threshold() -> f32 {
    0.508
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            forest: 0.56,
            ice_beach: 0.5,
            desert_land: 0.535,
            ice_land: 0.508,
        }
    }
}

/// Температурная модель: широтный градиент, скорректированный высотой
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemperatureSettings {
    /// Сигнал ниже этой границы даёт пустынные переопределения
    #[serde(default = "default_desert_temperature_cutoff")]
    pub desert_cutoff: f32,

    /// Сигнал выше этой границы даёт ледяные переопределения
    #[serde(default = "default_ice_temperature_cutoff")]
    pub ice_cutoff: f32,

    /// Делитель влияния высоты на температурный сигнал (положительный)
    #[serde(default = "default_noise_influence_divisor")]
    pub noise_influence_divisor: f32,
}

fn default_desert_temperature_cutoff() -> f32 {
    0.11
}
fn default_ice_temperature_cutoff() -> f32 {
    0.75
}
fn default_noise_influence_divisor() -> f32 {
    4.0
}

impl Default for TemperatureSettings {
    fn default() -> Self {
        Self {
            desert_cutoff: 0.11,
            ice_cutoff: 0.75,
            noise_influence_divisor: 4.0,
        }
    }
}

/// Ограничения прокладки рек
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiverSettings {
    /// Максимум рек за одну генерацию (0 = без рек)
    #[serde(default = "default_max_river_count")]
    pub max_river_count: usize,

    /// Шанс (в процентах, 0..100), что река всё же начнётся в пустынной зоне
    #[serde(default = "default_percent_chance_in_desert")]
    pub percent_chance_in_desert: f32,

    /// Шанс (в процентах, 0..100), что река всё же начнётся в снежной зоне
    #[serde(default = "default_percent_chance_in_snow")]
    pub percent_chance_in_snow: f32,
}

fn default_max_river_count() -> usize {
    30
}
fn default_percent_chance_in_desert() -> f32 {
    30.0
}
fn default_percent_chance_in_snow() -> f32 {
    40.0
}

impl Default for RiverSettings {
    fn default() -> Self {
        Self {
            max_river_count: 30,
            percent_chance_in_desert: 30.0,
            percent_chance_in_snow: 40.0,
        }
    }
}

/// Палитра: цвет для каждого из тринадцати типов тайлов.
///
/// `Empty` — сигнальное значение "ни одно правило не подошло";
/// оно рисуется цветом ошибки, а не приводит к сбою.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Palette {
    #[serde(default = "default_deep_sea_color")]
    pub deep_sea: [u8; 3],
    #[serde(default = "default_sea_color")]
    pub sea: [u8; 3],
    #[serde(default = "default_beach_color")]
    pub beach: [u8; 3],
    #[serde(default = "default_ice_beach_color")]
    pub ice_beach: [u8; 3],
    #[serde(default = "default_land_color")]
    pub land: [u8; 3],
    #[serde(default = "default_desert_land_color")]
    pub desert_land: [u8; 3],
    #[serde(default = "default_ice_land_color")]
    pub ice_land: [u8; 3],
    #[serde(default = "default_mountain_color")]
    pub mountain: [u8; 3],
    #[serde(default = "default_desert_mountain_color")]
    pub desert_mountain: [u8; 3],
    #[serde(default = "default_ice_mountain_color")]
    pub ice_mountain: [u8; 3],
    #[serde(default = "default_snow_color")]
    pub snow: [u8; 3],
    #[serde(default = "default_forest_color")]
    pub forest: [u8; 3],
    #[serde(default = "default_error_color")]
    pub error: [u8; 3],
}

fn default_deep_sea_color() -> [u8; 3] {
    [0, 0, 139] // DarkBlue
}
fn default_sea_color() -> [u8; 3] {
    [0, 0, 255] // Blue
}
fn default_beach_color() -> [u8; 3] {
    [244, 164, 96] // SandyBrown
}
fn default_ice_beach_color() -> [u8; 3] {
    [0, 128, 128] // Teal
}
fn default_land_color() -> [u8; 3] {
    [34, 139, 34] // ForestGreen
}
fn default_desert_land_color() -> [u8; 3] {
    [184, 134, 11] // DarkGoldenrod
}
fn default_ice_land_color() -> [u8; 3] {
    [211, 211, 211] // LightGray
}
fn default_mountain_color() -> [u8; 3] {
    [169, 169, 169] // DarkGray
}
fn default_desert_mountain_color() -> [u8; 3] {
    [218, 165, 32] // Goldenrod
}
fn default_ice_mountain_color() -> [u8; 3] {
    [255, 255, 255] // White
}
fn default_snow_color() -> [u8; 3] {
    [255, 255, 255] // White
}
fn default_forest_color() -> [u8; 3] {
    [0, 100, 0] // DarkGreen
}
fn default_error_color() -> [u8; 3] {
    [255, 105, 180] // HotPink
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            deep_sea: default_deep_sea_color(),
            sea: default_sea_color(),
            beach: default_beach_color(),
            ice_beach: default_ice_beach_color(),
            land: default_land_color(),
            desert_land: default_desert_land_color(),
            ice_land: default_ice_land_color(),
            mountain: default_mountain_color(),
            desert_mountain: default_desert_mountain_color(),
            ice_mountain: default_ice_mountain_color(),
            snow: default_snow_color(),
            forest: default_forest_color(),
            error: default_error_color(),
        }
    }
}

impl Palette {
    /// Цвет тайла; `Empty` отображается цветом ошибки
    #[must_use]
    pub fn color(&self, tile: TileType) -> [u8; 3] {
        match tile {
            TileType::Empty => self.error,
            TileType::DeepSea => self.deep_sea,
            TileType::Sea => self.sea,
            TileType::Beach => self.beach,
            TileType::IceBeach => self.ice_beach,
            TileType::Land => self.land,
            TileType::DesertLand => self.desert_land,
            TileType::IceLand => self.ice_land,
            TileType::Mountain => self.mountain,
            TileType::DesertMountain => self.desert_mountain,
            TileType::IceMountain => self.ice_mountain,
            TileType::Snow => self.snow,
            TileType::Forest => self.forest,
        }
    }
}

/// Полная конфигурация одной генерации мира
///
/// Снимок всех параметров; ядро читает его, но не изменяет.
/// Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    /// Сид генератора: им сеются и шум, и источник случайных чисел рек
    #[serde(default)]
    pub seed: u64,

    /// Ширина сетки в тайлах
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота сетки в тайлах
    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default)]
    pub noise: NoiseSettings,

    #[serde(default)]
    pub cutoffs: Cutoffs,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub temperature: TemperatureSettings,

    #[serde(default)]
    pub rivers: RiverSettings,

    #[serde(default)]
    pub palette: Palette,
}

fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    1280
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 1280,
            height: 1280,
            noise: NoiseSettings::default(),
            cutoffs: Cutoffs::default(),
            thresholds: Thresholds::default(),
            temperature: TemperatureSettings::default(),
            rivers: RiverSettings::default(),
            palette: Palette::default(),
        }
    }
}

impl GenerationConfig {
    /// Загружает конфигурацию из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # world.toml
    /// seed = 42
    /// width = 512
    /// height = 512
    ///
    /// [rivers]
    /// max_river_count = 12
    /// ```
    pub fn from_toml_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}

/// Детерминированное преобразование строкового сида в целочисленный.
///
/// FNV-1a 64: одна и та же строка всегда даёт один и тот же сид,
/// независимо от платформы и запуска.
#[must_use]
pub fn seed_from_str(s: &str) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in s.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_from_str_is_stable() {
        // Один и тот же строковый сид — один и тот же целочисленный
        assert_eq!(seed_from_str("abc"), seed_from_str("abc"));
        assert_ne!(seed_from_str("abc"), seed_from_str("abd"));
        assert_ne!(seed_from_str(""), seed_from_str("abc"));
    }

    #[test]
    fn toml_missing_fields_fall_back_to_defaults() {
        let config: GenerationConfig = toml::from_str("seed = 7").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.width, 1280);
        assert_eq!(config.cutoffs, Cutoffs::default());
        assert_eq!(config.palette.error, [255, 105, 180]);
    }

    #[test]
    fn toml_overrides_nested_sections() {
        let toml_src = r"
            seed = 1
            width = 256
            height = 128

            [rivers]
            max_river_count = 5

            [cutoffs]
            land = 0.7
        ";
        let config: GenerationConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.rivers.max_river_count, 5);
        assert_eq!(config.rivers.percent_chance_in_snow, 40.0);
        assert_eq!(config.cutoffs.land, 0.7);
        assert_eq!(config.cutoffs.sea, 0.5);
    }

    #[test]
    fn palette_maps_empty_to_error_color() {
        let palette = Palette::default();
        assert_eq!(palette.color(TileType::Empty), palette.error);
        assert_eq!(palette.color(TileType::DeepSea), [0, 0, 139]);
        assert_eq!(palette.color(TileType::Forest), [0, 100, 0]);
    }
}
