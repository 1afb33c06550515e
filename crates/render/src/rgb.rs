mod color;

use std::ops;

pub use self::color::Color;

pub type Idx = [u32; 2];

/// Pixels stored row by row, indexed `[x, y]`.
#[derive(Debug, Clone)]
pub struct Buf {
    dim: Idx,
    buf: Vec<Color>,
}

impl Buf {
    pub fn new(dim @ [dx, dy]: Idx) -> Buf {
        Buf { dim, buf: vec![Color::default(); dx as usize * dy as usize] }
    }
    pub fn by_row(&self) -> impl Iterator<Item = Idx> {
        let [dx, dy] = self.dim;
        (0..dy).flat_map(move |y| (0..dx).map(move |x| [x, y]))
    }
    pub fn buf(&self) -> &[Color] {
        &self.buf
    }
    pub fn dim(&self) -> Idx {
        self.dim
    }
    pub fn width(&self) -> u32 {
        self.dim[0]
    }
    pub fn height(&self) -> u32 {
        self.dim[1]
    }
    fn linear(&self, idx: Idx) -> Option<usize> {
        if !(idx[0] < self.dim[0] && idx[1] < self.dim[1]) {
            return None;
        }
        Some(idx[0] as usize + idx[1] as usize * self.dim[0] as usize)
    }
}

impl ops::Index<Idx> for Buf {
    type Output = Color;

    fn index(&self, index: Idx) -> &Self::Output {
        let l = self.linear(index).unwrap();
        &self.buf[l]
    }
}

impl ops::IndexMut<Idx> for Buf {
    fn index_mut(&mut self, index: Idx) -> &mut Self::Output {
        let l = self.linear(index).unwrap();
        &mut self.buf[l]
    }
}
