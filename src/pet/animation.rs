use super::direction::Direction;

/// Frames per clip in the pet sheet.
pub const FRAMES_PER_CLIP: u8 = 6;
/// Playback rate in frames/second.
const FRAME_RATE: f32 = 6.0;

/// Which clip family is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    Idle,
    Walk,
}

impl Clip {
    fn prefix(self) -> &'static str {
        match self {
            Clip::Idle => "idle",
            Clip::Walk => "walk",
        }
    }
}

/// What the animation driver should be showing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationCue {
    pub clip: Clip,
    pub facing: Direction,
    /// False while dragged: hold the clip's first frame.
    pub playing: bool,
}

impl AnimationCue {
    /// Sheet key, e.g. `idle_4` or `walk_6`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.clip.prefix(), self.facing.index())
    }
}

/// Frame player for the current cue.
#[derive(Debug, Clone, Copy)]
pub struct AnimationState {
    pub cue: AnimationCue,
    pub frame: u8,
    pub elapsed: f32,
}

impl AnimationState {
    pub fn new(cue: AnimationCue) -> Self {
        Self {
            cue,
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Switch cue. Restarts from frame 0 only when the key or play state changed,
    /// and returns whether it did.
    pub fn set_cue(&mut self, cue: AnimationCue) -> bool {
        if cue == self.cue {
            return false;
        }
        self.cue = cue;
        self.frame = 0;
        self.elapsed = 0.0;
        true
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if !self.cue.playing {
            self.frame = 0;
            return;
        }
        self.elapsed += dt.max(0.0);
        let step = 1.0 / FRAME_RATE;
        while self.elapsed >= step {
            self.elapsed -= step;
            self.frame = (self.frame + 1) % FRAMES_PER_CLIP;
        }
    }
}
