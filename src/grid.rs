/// Плотная двумерная сетка на торе: обе оси зациклены.
///
/// Используется и для карты высот (`Grid<f32>`), и для тайловой сетки
/// (`Grid<TileType>`). Хранение построчное, индекс `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    pub width: u32,
    pub height: u32,
    pub data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: u32, height: u32, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; (width * height) as usize],
        }
    }
}

impl<T: Copy> Grid<T> {
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> T {
        self.data[(y * self.width + x) as usize]
    }

    /// Чтение с зацикливанием по обеим осям (x = -1 → x = width - 1 и т.д.)
    #[inline]
    pub fn get_wrapped(&self, x: i32, y: i32) -> T {
        let (wx, wy) = self.wrap(x, y);
        self.get(wx, wy)
    }
}

impl<T> Grid<T> {
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        self.data[(y * self.width + x) as usize] = value;
    }

    #[inline]
    pub fn idx(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    /// Приводит произвольные координаты к сетке через rem_euclid
    #[inline]
    pub fn wrap(&self, x: i32, y: i32) -> (u32, u32) {
        let wx = x.rem_euclid(self.width as i32) as u32;
        let wy = y.rem_euclid(self.height as i32) as u32;
        (wx, wy)
    }
}
