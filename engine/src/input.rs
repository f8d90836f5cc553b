use scarecrow_core::MoveKeys;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heading {
    Up,
    Down,
    Left,
    Right,
}

const KEY_ALIASES: [(&str, Heading); 12] = [
    ("w", Heading::Up),
    ("W", Heading::Up),
    ("ArrowUp", Heading::Up),
    ("s", Heading::Down),
    ("S", Heading::Down),
    ("ArrowDown", Heading::Down),
    ("a", Heading::Left),
    ("A", Heading::Left),
    ("ArrowLeft", Heading::Left),
    ("d", Heading::Right),
    ("D", Heading::Right),
    ("ArrowRight", Heading::Right),
];

/// Tracks which movement keys are held, by name.
///
/// Each alias is tracked separately so releasing `"w"` keeps moving up while
/// `"ArrowUp"` is still down.
#[derive(Clone, Debug, Default)]
pub(crate) struct KeyState {
    held: [bool; KEY_ALIASES.len()],
}

impl KeyState {
    /// Marks the named key as held. Returns `false` for keys that do not move.
    pub(crate) fn press(&mut self, name: &str) -> bool {
        self.set(name, true)
    }

    /// Marks the named key as released. Returns `false` for keys that do not move.
    pub(crate) fn release(&mut self, name: &str) -> bool {
        self.set(name, false)
    }

    pub(crate) fn clear(&mut self) {
        self.held = [false; KEY_ALIASES.len()];
    }

    pub(crate) fn keys(&self) -> MoveKeys {
        let mut keys = MoveKeys::default();
        for ((_, heading), held) in KEY_ALIASES.iter().zip(self.held) {
            if !held {
                continue;
            }
            match heading {
                Heading::Up => keys.up = true,
                Heading::Down => keys.down = true,
                Heading::Left => keys.left = true,
                Heading::Right => keys.right = true,
            }
        }
        keys
    }

    fn set(&mut self, name: &str, held: bool) -> bool {
        match KEY_ALIASES.iter().position(|(alias, _)| *alias == name) {
            Some(index) => {
                self.held[index] = held;
                true
            }
            None => false,
        }
    }
}
