//! Прокладка рек жадным спуском по высоте с восстановлением ветвей
//!
//! Реки стартуют из случайных клеток с высотой не ниже land-отсечки и
//! спускаются к уровню моря, помечая пройденные клетки (и их четырёх
//! соседей — река шириной в три клетки) как `Sea`. Порядок обращений к
//! генератору случайных чисел фиксирован: индекс кандидата, затем бросок
//! пустынных шансов, затем бросок снежных — это гарантирует
//! воспроизводимость при одинаковом сиде.

use crate::config::GenerationConfig;
use crate::grid::Grid;
use crate::tile::{TileType, temperature_signal};
use rand::Rng;

/// Предохранитель от патологических конфигураций: суммарный лимит попыток
pub const MAX_RIVER_ATTEMPTS: usize = 100_000;

/// Предохранитель: лимит шагов одной реки
pub const MAX_STEPS_PER_RIVER: usize = 1_000_000;

/// Фиксированный порядок обхода ортогональных соседей.
/// От него зависит разрешение ничьих при выборе следующей клетки.
const NEIGHBORS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Итог прокладки рек за одну генерацию
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiverStats {
    /// Попытки, прошедшие температурные ворота (включая оборванные реки)
    pub made: usize,
    /// Все сделанные попытки, включая отклонённые воротами
    pub attempted: usize,
}

/// Состояние клетки в рамках одной реки.
///
/// Арена по плоскому индексу вместо хэш-таблицы координат: создаётся
/// заново на каждую реку и не переживает её.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Live,
    Dead,
}

/// Прокладывает до `max_river_count` рек по классифицированной сетке.
///
/// Кандидаты на исток — все клетки с высотой ≥ land-отсечки. Каждая
/// попытка, прошедшая температурные ворота, считается "сделанной" рекой,
/// даже если спуск оборвался в локальном минимуме или упёрся в лимит
/// шагов; генерация при этом всегда завершается.
pub fn carve_rivers(
    tiles: &mut Grid<TileType>,
    elevation: &Grid<f32>,
    config: &GenerationConfig,
    rng: &mut impl Rng,
) -> RiverStats {
    let land_cutoff = config.cutoffs.land;

    let candidates: Vec<(u32, u32)> = (0..elevation.data.len())
        .filter(|&i| elevation.data[i] >= land_cutoff)
        .map(|i| (i as u32 % elevation.width, i as u32 / elevation.width))
        .collect();

    let mut stats = RiverStats {
        made: 0,
        attempted: 0,
    };
    if candidates.is_empty() {
        return stats;
    }

    while stats.attempted < MAX_RIVER_ATTEMPTS && stats.made < config.rivers.max_river_count {
        stats.attempted += 1;

        let (source_x, source_y) = candidates[rng.gen_range(0..candidates.len())];
        let source_elevation = elevation.get(source_x, source_y);

        // Перестраховка: кандидаты уже отобраны по land-отсечке
        if source_elevation < land_cutoff {
            continue;
        }

        let signal = temperature_signal(source_elevation, source_y, elevation.height, config);
        if signal < config.temperature.desert_cutoff {
            let roll = rng.gen_range(0..=100u32);
            if roll as f32 > config.rivers.percent_chance_in_desert {
                continue;
            }
        }
        if signal > config.temperature.ice_cutoff {
            let roll = rng.gen_range(0..=100u32);
            if roll as f32 > config.rivers.percent_chance_in_snow {
                continue;
            }
        }

        carve_one_river(tiles, elevation, config, source_x, source_y);
        stats.made += 1;
    }

    stats
}

/// Спуск одной реки от истока до уровня моря.
fn carve_one_river(
    tiles: &mut Grid<TileType>,
    elevation: &Grid<f32>,
    config: &GenerationConfig,
    source_x: u32,
    source_y: u32,
) {
    let sea_cutoff = config.cutoffs.sea;

    let mut visit = vec![VisitState::Unvisited; elevation.data.len()];
    // Порядок первого посещения: при равных высотах восстановление ветви
    // выбирает раньше посещённую клетку
    let mut visited: Vec<usize> = Vec::new();

    let (mut x, mut y) = (source_x, source_y);
    let mut current = elevation.get(x, y);
    let mut steps = 0;

    while current > sea_cutoff && steps < MAX_STEPS_PER_RIVER {
        let idx = elevation.idx(x, y);
        if visit[idx] == VisitState::Unvisited {
            visit[idx] = VisitState::Live;
            visited.push(idx);
        }
        tiles.set(x, y, TileType::Sea);

        // Жадный шаг: самый низкий ещё не посещённый сосед; при равенстве
        // высот побеждает первый по порядку обхода
        let mut next: Option<(u32, u32, f32)> = None;
        for (dx, dy) in NEIGHBORS {
            let (nx, ny) = tiles.wrap(x as i32 + dx, y as i32 + dy);
            // Расширение русла: соседи тоже становятся морем
            tiles.set(nx, ny, TileType::Sea);

            if visit[elevation.idx(nx, ny)] != VisitState::Unvisited {
                continue;
            }
            let neighbor_elevation = elevation.get(nx, ny);
            if next.is_none_or(|(_, _, lowest)| neighbor_elevation < lowest) {
                next = Some((nx, ny, neighbor_elevation));
            }
        }

        if let Some((nx, ny, ne)) = next {
            x = nx;
            y = ny;
            current = ne;
        } else {
            // Локальный минимум: клетка мертва, ветвимся из самой низкой
            // из живых посещённых
            visit[idx] = VisitState::Dead;

            let mut branch: Option<(usize, f32)> = None;
            for &vidx in &visited {
                if visit[vidx] != VisitState::Live {
                    continue;
                }
                let visited_elevation = elevation.data[vidx];
                if branch.is_none_or(|(_, lowest)| visited_elevation < lowest) {
                    branch = Some((vidx, visited_elevation));
                }
            }

            let Some((vidx, ve)) = branch else {
                // Живых клеток не осталось: река брошена, уже
                // проложенные тайлы остаются
                return;
            };
            x = vidx as u32 % elevation.width;
            y = vidx as u32 / elevation.width;
            current = ve;
        }

        steps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::classify;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn classify_grid(elevation: &Grid<f32>, config: &GenerationConfig) -> Grid<TileType> {
        let mut tiles = Grid::new(elevation.width, elevation.height, TileType::Empty);
        for y in 0..elevation.height {
            for x in 0..elevation.width {
                let tile = classify(elevation.get(x, y), y, elevation.height, config);
                tiles.set(x, y, tile);
            }
        }
        tiles
    }

    /// Конус: вершина в центре, высота спадает к краям ниже уровня моря
    fn cone_elevation(size: u32) -> Grid<f32> {
        let mut field = Grid::new(size, size, 0.0f32);
        let center = size as f32 / 2.0;
        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 - center).abs();
                let dy = (y as f32 - center).abs();
                let distance = dx.max(dy) / center;
                field.set(x, y, (1.0 - distance).clamp(0.0, 0.95));
            }
        }
        field
    }

    fn test_config(size: u32) -> GenerationConfig {
        let mut config = GenerationConfig::default();
        config.width = size;
        config.height = size;
        // Без температурных ворот: интересует сам спуск
        config.temperature.desert_cutoff = -10.0;
        config.temperature.ice_cutoff = 10.0;
        config
    }

    #[test]
    fn zero_max_rivers_leaves_grid_untouched() {
        let size = 16;
        let elevation = cone_elevation(size);
        let mut config = test_config(size);
        config.rivers.max_river_count = 0;

        let tiles_before = classify_grid(&elevation, &config);
        let mut tiles = tiles_before.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let stats = carve_rivers(&mut tiles, &elevation, &config, &mut rng);

        assert_eq!(stats.made, 0);
        assert_eq!(tiles, tiles_before);
    }

    #[test]
    fn empty_candidate_set_terminates_immediately() {
        let size = 16;
        let elevation = cone_elevation(size);
        let mut config = test_config(size);
        config.cutoffs.land = 1.0; // ни одна клетка не достигает

        let mut tiles = classify_grid(&elevation, &config);
        let before = tiles.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let stats = carve_rivers(&mut tiles, &elevation, &config, &mut rng);

        assert_eq!(stats.made, 0);
        assert_eq!(stats.attempted, 0);
        assert_eq!(tiles, before);
    }

    #[test]
    fn carved_cells_are_sea() {
        let size = 24;
        let elevation = cone_elevation(size);
        let config = test_config(size);

        let tiles_before = classify_grid(&elevation, &config);
        let mut tiles = tiles_before.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let stats = carve_rivers(&mut tiles, &elevation, &config, &mut rng);

        assert!(stats.made > 0);
        // Каждая изменённая клетка стала морем
        let mut changed = 0;
        for i in 0..tiles.data.len() {
            if tiles.data[i] != tiles_before.data[i] {
                assert_eq!(tiles.data[i], TileType::Sea);
                changed += 1;
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn made_rivers_respect_configured_limit() {
        let size = 24;
        let elevation = cone_elevation(size);
        let mut config = test_config(size);
        config.rivers.max_river_count = 3;

        let mut tiles = classify_grid(&elevation, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let stats = carve_rivers(&mut tiles, &elevation, &config, &mut rng);

        assert!(stats.made <= 3);
        assert!(stats.attempted <= MAX_RIVER_ATTEMPTS);
    }

    #[test]
    fn carving_is_deterministic_for_fixed_rng_seed() {
        let size = 24;
        let elevation = cone_elevation(size);
        let config = test_config(size);

        let mut tiles_a = classify_grid(&elevation, &config);
        let mut tiles_b = tiles_a.clone();

        let mut rng_a = ChaCha8Rng::seed_from_u64(77);
        let mut rng_b = ChaCha8Rng::seed_from_u64(77);
        let stats_a = carve_rivers(&mut tiles_a, &elevation, &config, &mut rng_a);
        let stats_b = carve_rivers(&mut tiles_b, &elevation, &config, &mut rng_b);

        assert_eq!(stats_a, stats_b);
        assert_eq!(tiles_a.data, tiles_b.data);
    }

    #[test]
    fn gated_attempts_do_not_count_as_made() {
        let size = 16;
        let elevation = cone_elevation(size);
        let mut config = test_config(size);
        // Все истоки "пустынные", шанс реки нулевой: каждая попытка
        // отклоняется воротами
        config.temperature.desert_cutoff = 10.0;
        config.rivers.percent_chance_in_desert = -1.0;
        config.rivers.max_river_count = 5;

        let mut tiles = classify_grid(&elevation, &config);
        let before = tiles.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let stats = carve_rivers(&mut tiles, &elevation, &config, &mut rng);

        assert_eq!(stats.made, 0);
        assert_eq!(stats.attempted, MAX_RIVER_ATTEMPTS);
        assert_eq!(tiles, before);
    }

    #[test]
    fn river_descends_across_the_seam() {
        // Высокий гребень у правого края, минимум за швом слева:
        // спуск обязан пройти через границу тора
        let size = 8;
        let mut elevation = Grid::new(size, size, 0.1f32);
        for y in 0..size {
            elevation.set(size - 1, y, 0.9);
            elevation.set(0, y, 0.05);
        }
        let mut config = test_config(size);
        config.rivers.max_river_count = 1;

        let mut tiles = classify_grid(&elevation, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let stats = carve_rivers(&mut tiles, &elevation, &config, &mut rng);

        assert_eq!(stats.made, 1);
        // Река с гребня x = size-1 уходит за шов: столбец x = 0 затронут
        let left_column_sea = (0..size).any(|y| tiles.get(0, y) == TileType::Sea);
        assert!(left_column_sea);
    }
}
