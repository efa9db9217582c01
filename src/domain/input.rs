/// Abstract per-frame input.
///
/// The host maps physical keys/buttons onto these identifiers.
/// Movement reads `held` (continuous while the key is down); jump reads
/// `pressed` (edge-triggered, only on the frame the key went down).

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Jump,
}

impl Key {
    const fn bit(self) -> u8 {
        match self {
            Key::Left => 1,
            Key::Right => 1 << 1,
            Key::Up => 1 << 2,
            Key::Down => 1 << 3,
            Key::Jump => 1 << 4,
        }
    }
}

/// Small copyable set of keys.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct KeySet(u8);

impl KeySet {
    pub const EMPTY: KeySet = KeySet(0);

    pub fn contains(self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub fn remove(&mut self, key: Key) {
        self.0 &= !key.bit();
    }

    pub fn with(mut self, key: Key) -> Self {
        self.insert(key);
        self
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut set = KeySet::EMPTY;
        for k in iter { set.insert(k); }
        set
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    /// Keys currently down.
    pub held: KeySet,
    /// Keys that went down this frame.
    pub pressed: KeySet,
}

impl FrameInput {
    pub fn idle() -> Self {
        FrameInput::default()
    }

    pub fn holding(keys: &[Key]) -> Self {
        FrameInput { held: keys.iter().copied().collect(), pressed: KeySet::EMPTY }
    }

    /// Add a fresh press (also counts as held).
    pub fn press(mut self, key: Key) -> Self {
        self.held.insert(key);
        self.pressed.insert(key);
        self
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(key)
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(key)
    }
}

/// Tracks held keys across frames and derives fresh presses.
/// Feed it the raw "down" set each frame.
#[derive(Clone, Debug, Default)]
pub struct InputTracker {
    previous: KeySet,
}

impl InputTracker {
    pub fn new() -> Self {
        InputTracker::default()
    }

    pub fn frame(&mut self, down: KeySet) -> FrameInput {
        let pressed = KeySet(down.0 & !self.previous.0);
        self.previous = down;
        FrameInput { held: down, pressed }
    }
}
