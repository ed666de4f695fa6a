// Grid cell - one addressable character slot

use crate::grid::traits::CellDisplay;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    pub index: usize,
    /// Symbol currently shown
    pub character: char,
    /// Symbol assigned at build time; toggles restore it
    pub filler: char,
    pub fixed: bool,
    pub marker: bool,
    pub visible: bool,
    pub drawn: bool,
}

impl Cell {
    pub fn new(index: usize, character: char) -> Self {
        Self {
            index,
            character,
            filler: character,
            fixed: false,
            marker: false,
            visible: false,
            drawn: false,
        }
    }

    pub fn fixed(index: usize, character: char) -> Self {
        Self {
            fixed: true,
            ..Self::new(index, character)
        }
    }

    pub fn marker(index: usize, character: char) -> Self {
        Self {
            marker: true,
            ..Self::new(index, character)
        }
    }

    /// Neither pinned text nor already drawn
    pub fn is_drawable(&self) -> bool {
        !self.fixed && !self.drawn
    }

    /// Overwrite with interactive content
    pub fn draw(&mut self, character: char) {
        self.character = character;
        self.drawn = true;
    }
}

impl CellDisplay for Cell {
    fn display_char(&self) -> char {
        self.character
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_fixed(&self) -> bool {
        self.fixed
    }

    fn is_marker(&self) -> bool {
        self.marker
    }

    fn is_drawn(&self) -> bool {
        self.drawn
    }
}
