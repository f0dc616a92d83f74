//! Типы тайлов и классификация рельефа
//!
//! Классификация каждой клетки независима от соседей и идёт в строгом
//! порядке: базовая зона по высоте, затем лесное переопределение, затем
//! температурное (пустыня/лёд).

use crate::config::GenerationConfig;
use serde::{Deserialize, Serialize};

/// Замкнутое перечисление типов тайлов.
///
/// `Empty` — сигнал "ни одно правило не подошло" (отсечки не покрывают
/// [0, 1]); рисуется цветом ошибки и не является сбоем.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileType {
    Empty,
    DeepSea,
    Sea,
    Beach,
    IceBeach,
    Land,
    DesertLand,
    IceLand,
    Mountain,
    DesertMountain,
    IceMountain,
    Snow,
    Forest,
}

/// Температурный сигнал клетки: широтный градиент минус вклад высоты.
///
/// Градиент равен 0 на экваторе и стремится к 1 у полюсов. Деление
/// высоты на делитель сдвигает сигнал вниз: высокие места "холоднее"
/// по пустынному критерию, но легче достигают ледяного.
#[must_use]
pub fn temperature_signal(elevation: f32, y: u32, height: u32, config: &GenerationConfig) -> f32 {
    let half = height as i32 / 2;
    let gradient = (y as i32 - half).abs() as f32 / (height as f32 / 2.0);
    gradient - elevation / config.temperature.noise_influence_divisor
}

/// Классифицирует клетку по высоте и широте.
///
/// Порядок фиксирован и значим:
/// 1. Базовая зона по возрастающим отсечкам (строгое `<`).
/// 2. Лесное переопределение в интервале (forest_threshold, forest_cutoff).
/// 3. Температурное переопределение — одна цепочка else-if, пустынные
///    ветви раньше ледяных; применяется не более одного переопределения.
///    При перекрывающихся диапазонах часть ветвей недостижима — порядок
///    сохранён намеренно, ради совместимости поведения.
#[must_use]
pub fn classify(elevation: f32, y: u32, height: u32, config: &GenerationConfig) -> TileType {
    let cutoffs = &config.cutoffs;

    let mut tile = if elevation < cutoffs.deep_sea {
        TileType::DeepSea
    } else if elevation < cutoffs.sea {
        TileType::Sea
    } else if elevation < cutoffs.beach {
        TileType::Beach
    } else if elevation < cutoffs.land {
        TileType::Land
    } else if elevation < cutoffs.mountain {
        TileType::Mountain
    } else if elevation < cutoffs.snow {
        TileType::Snow
    } else {
        TileType::Empty
    };

    if elevation > config.thresholds.forest && elevation < cutoffs.forest {
        tile = TileType::Forest;
    }

    let signal = temperature_signal(elevation, y, height, config);
    let temperature = &config.temperature;
    let thresholds = &config.thresholds;

    if elevation >= thresholds.desert_land
        && elevation < cutoffs.desert_land
        && signal < temperature.desert_cutoff
    {
        TileType::DesertLand
    } else if elevation >= cutoffs.desert_land && signal < temperature.desert_cutoff {
        TileType::DesertMountain
    } else if elevation >= thresholds.ice_beach
        && elevation < cutoffs.ice_beach
        && signal > temperature.ice_cutoff
    {
        TileType::IceBeach
    } else if elevation >= thresholds.ice_land
        && elevation < cutoffs.ice_land
        && signal > temperature.ice_cutoff
    {
        TileType::IceLand
    } else if elevation >= cutoffs.ice_land && signal > temperature.ice_cutoff {
        TileType::IceMountain
    } else {
        tile
    }
}
