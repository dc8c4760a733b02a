//! DOM-free logic behind the page chrome: the scroll-driven header fade and
//! the visualization carousel.

/// Fraction of a viewport height over which the header fades out.
const FADE_SPAN: f32 = 0.15;

/// Header and about-section styling for one scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderFade {
    pub progress: f32,
    pub header_opacity: f32,
    pub header_translate: f32,
    pub header_scale: f32,
    pub about_opacity: f32,
    pub about_translate: f32,
    /// Whether the about block is `active` and the header `scrolled`.
    pub active: bool,
}

impl HeaderFade {
    pub fn at(scroll_y: f32, viewport_height: f32) -> Self {
        let fraction = if viewport_height > 0.0 {
            (scroll_y / viewport_height).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let p = (fraction / FADE_SPAN).min(1.0);
        Self {
            progress: p,
            header_opacity: (1.0 - p).max(0.0),
            header_translate: -80.0 * p,
            header_scale: 1.0 - 0.3 * p,
            about_opacity: p,
            about_translate: 20.0 - 20.0 * p,
            active: fraction >= FADE_SPAN || p > 0.1,
        }
    }

    pub fn header_transform(&self) -> String {
        format!(
            "translateY({}px) scale({})",
            self.header_translate, self.header_scale
        )
    }

    pub fn about_transform(&self) -> String {
        format!("translate(-50%, -50%) translateY({}px)", self.about_translate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Neural,
    Quantum,
    Limitless,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Neural, Panel::Quantum, Panel::Limitless];

    /// Key used in element ids and `data-viz` attributes.
    pub fn key(self) -> &'static str {
        match self {
            Panel::Neural => "neural",
            Panel::Quantum => "quantum",
            Panel::Limitless => "gojo",
        }
    }

    pub fn canvas_id(self) -> String {
        format!("{}Canvas", self.key())
    }

    fn index(self) -> usize {
        match self {
            Panel::Neural => 0,
            Panel::Quantum => 1,
            Panel::Limitless => 2,
        }
    }
}

/// Result of moving the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch {
    pub from: Panel,
    pub to: Panel,
    /// `to` is being shown for the first time and must be started.
    pub first_show: bool,
}

/// Cyclic selection over the three panels. Neural is shown first.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    index: usize,
    shown: [bool; 3],
}

impl Carousel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Panel {
        Panel::ALL[self.index]
    }

    pub fn step(&mut self, direction: i32) -> Switch {
        let from = self.current();
        let len = Panel::ALL.len() as i32;
        self.index = (self.index as i32 + direction).rem_euclid(len) as usize;
        let to = self.current();
        Switch {
            from,
            to,
            first_show: self.mark_shown(to),
        }
    }

    /// Records that `panel` is visible. Returns true the first time only.
    pub fn mark_shown(&mut self, panel: Panel) -> bool {
        !std::mem::replace(&mut self.shown[panel.index()], true)
    }
}

/// Arrow keys move the carousel; everything else is ignored.
pub fn arrow_direction(key: &str) -> Option<i32> {
    match key {
        "ArrowLeft" => Some(-1),
        "ArrowRight" => Some(1),
        _ => None,
    }
}

/// An element's bounding box overlaps the viewport vertically.
pub fn in_view(top: f64, bottom: f64, viewport_height: f64) -> bool {
    top < viewport_height && bottom > 0.0
}

pub fn modal_id(project: &str) -> String {
    format!("modal-{project}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_of_page_shows_header() {
        let fade = HeaderFade::at(0.0, 1000.0);
        assert_eq!(fade.header_opacity, 1.0);
        assert_eq!(fade.about_opacity, 0.0);
        assert!(!fade.active);
        assert_eq!(fade.about_transform(), "translate(-50%, -50%) translateY(20px)");
    }

    #[test]
    fn halfway_through_fade() {
        let fade = HeaderFade::at(75.0, 1000.0);
        assert!((fade.progress - 0.5).abs() < 1e-6);
        assert!((fade.header_translate + 40.0).abs() < 1e-4);
        assert!((fade.header_scale - 0.85).abs() < 1e-6);
        assert!(fade.active);
    }

    #[test]
    fn past_fade_span_is_fully_transitioned() {
        let fade = HeaderFade::at(600.0, 1000.0);
        assert_eq!(fade.progress, 1.0);
        assert_eq!(fade.header_opacity, 0.0);
        assert_eq!(fade.header_transform(), "translateY(-80px) scale(0.7)");
        assert!(fade.active);
    }

    #[test]
    fn barely_scrolled_is_not_active() {
        assert!(!HeaderFade::at(10.0, 1000.0).active);
        assert!(HeaderFade::at(16.0, 1000.0).active);
    }

    #[test]
    fn carousel_wraps_both_ways() {
        let mut carousel = Carousel::new();
        carousel.mark_shown(Panel::Neural);
        let back = carousel.step(-1);
        assert_eq!(back.from, Panel::Neural);
        assert_eq!(back.to, Panel::Limitless);
        assert!(back.first_show);

        let forward = carousel.step(1);
        assert_eq!(forward.to, Panel::Neural);
        assert!(!forward.first_show);

        assert_eq!(carousel.step(1).to, Panel::Quantum);
        assert_eq!(carousel.step(1).to, Panel::Limitless);
        assert_eq!(carousel.step(1).to, Panel::Neural);
    }

    #[test]
    fn panel_ids() {
        assert_eq!(Panel::Limitless.canvas_id(), "gojoCanvas");
        assert_eq!(Panel::Neural.canvas_id(), "neuralCanvas");
        assert_eq!(modal_id("saronic"), "modal-saronic");
    }

    #[test]
    fn keyboard_and_visibility() {
        assert_eq!(arrow_direction("ArrowRight"), Some(1));
        assert_eq!(arrow_direction("Enter"), None);
        assert!(in_view(-100.0, 200.0, 800.0));
        assert!(!in_view(900.0, 1400.0, 800.0));
        assert!(!in_view(-500.0, 0.0, 800.0));
    }
}
