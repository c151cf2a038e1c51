use std::sync::mpsc;

use glam::Vec2;

/// Clickable rectangle of the pet, centred on its position, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    /// Centre x.
    pub x: f32,
    /// Centre y.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HitRegion {
    pub fn centered(pos: Vec2, size: Vec2) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            width: size.x,
            height: size.y,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        point.x >= self.x - half_w
            && point.x <= self.x + half_w
            && point.y >= self.y - half_h
            && point.y <= self.y + half_h
    }
}

/// Tells the host where the pet can currently be clicked.
///
/// Fire-and-forget: implementations must not block, and must log and swallow
/// their own failures.
pub trait HitRegionPublisher {
    fn publish(&self, region: HitRegion);
}

/// Publishes over an mpsc channel to whoever owns the window.
pub struct ChannelPublisher {
    tx: mpsc::Sender<HitRegion>,
}

impl ChannelPublisher {
    pub fn new() -> (Self, mpsc::Receiver<HitRegion>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl HitRegionPublisher for ChannelPublisher {
    fn publish(&self, region: HitRegion) {
        if let Err(e) = self.tx.send(region) {
            log::warn!("Hit region publish dropped: {e}");
        }
    }
}

/// Host side: tracks the latest published region and decides whether the
/// window should take mouse input (over the pet) or pass it through.
pub struct ClickThrough {
    rx: mpsc::Receiver<HitRegion>,
    region: Option<HitRegion>,
    over: bool,
    hittest: bool,
}

impl ClickThrough {
    /// Starts with hit-testing off, matching a freshly set up overlay.
    pub fn new(rx: mpsc::Receiver<HitRegion>) -> Self {
        Self {
            rx,
            region: None,
            over: false,
            hittest: false,
        }
    }

    /// Drain pending publishes; only the newest matters.
    pub fn drain(&mut self) {
        if let Some(latest) = self.rx.try_iter().last() {
            self.region = Some(latest);
        }
    }

    #[cfg(test)]
    pub fn region(&self) -> Option<HitRegion> {
        self.region
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Re-test the cursor. `hold` keeps hit-testing on regardless (mid-drag).
    ///
    /// Returns `Some(enabled)` only when the window's hit-testing should flip.
    pub fn update(&mut self, cursor: Vec2, hold: bool) -> Option<bool> {
        self.over = self.region.is_some_and(|r| r.contains(cursor));
        let want = self.over || hold;
        if want != self.hittest {
            self.hittest = want;
            Some(want)
        } else {
            None
        }
    }
}
