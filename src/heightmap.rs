//! Бесшовная карта высот на торе

use crate::config::NoiseSettings;
use crate::grid::Grid;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Генерирует карту высот, бесшовную по обеим осям.
///
/// Каждая точка сетки проецируется на поверхность тора в 4D
/// (две окружности: угол по X в одной паре координат, угол по Y в другой),
/// и в этой точке сэмплируется fBm-шум. Период задаёт размер базовой
/// волны в тайлах: частота шума = 1 / period.
///
/// Функция чистая: одинаковые аргументы дают бит-идентичную карту.
#[must_use]
pub fn generate_elevation(
    seed: u64,
    settings: &NoiseSettings,
    width: u32,
    height: u32,
) -> Grid<f32> {
    let fbm = Fbm::<Perlin>::new(seed as u32)
        .set_octaves(settings.octaves)
        .set_frequency(1.0 / f64::from(settings.period))
        .set_persistence(f64::from(settings.persistence))
        .set_lacunarity(f64::from(settings.lacunarity));

    let width_f = f64::from(width);
    let height_f = f64::from(height);
    let tau = 2.0 * std::f64::consts::PI;

    // Радиусы подобраны так, чтобы длина окружности совпадала с размером
    // сетки: один тайл соответствует одной единице длины дуги
    let r1 = width_f / tau;
    let r2 = height_f / tau;

    let sample = |i: usize| -> f32 {
        let x = (i as u32 % width) as f64;
        let y = (i as u32 / width) as f64;

        let u = x / width_f * tau;
        let v = y / height_f * tau;

        let value = fbm.get([r1 * u.cos(), r1 * u.sin(), r2 * v.cos(), r2 * v.sin()]);
        (((value + 1.0) * 0.5) as f32).clamp(0.0, 1.0)
    };

    let len = (width * height) as usize;

    #[cfg(feature = "parallel")]
    let data: Vec<f32> = (0..len).into_par_iter().map(sample).collect();

    #[cfg(not(feature = "parallel"))]
    let data: Vec<f32> = (0..len).map(sample).collect();

    Grid {
        width,
        height,
        data,
    }
}
