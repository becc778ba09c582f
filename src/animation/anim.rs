use crate::{
    animation::ease::Ease,
    foundation::core::{Rgba8, Vec2},
    foundation::error::{TrailerError, TrailerResult},
};

/// Interpolation contract for animated value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t`.
    ///
    /// `t` may leave `[0, 1]` when an ease curve overshoots.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// One stop of a [`Keyframes`] track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    /// Position of the stop in normalized cue progress, `[0, 1]`.
    pub at: f64,
    /// Value held at this stop.
    pub value: T,
    /// Ease applied toward the next stop.
    pub ease: Ease,
}

/// Piecewise track over normalized progress.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframes<T> {
    /// Stops sorted by `at`, first at `0` and last at `1`.
    pub keys: Vec<Keyframe<T>>,
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone,
{
    /// Two-stop tween from `from` to `to`.
    ///
    /// The segment itself is linear; shaping comes from the owning cue's timing ease.
    pub fn tween(from: T, to: T) -> Self {
        Self {
            keys: vec![
                Keyframe {
                    at: 0.0,
                    value: from,
                    ease: Ease::Linear,
                },
                Keyframe {
                    at: 1.0,
                    value: to,
                    ease: Ease::Linear,
                },
            ],
        }
    }

    /// Multi-stop track from parallel `times` and `values`, every segment shaped by `ease`.
    pub fn stops(times: &[f64], values: Vec<T>, ease: Ease) -> TrailerResult<Self> {
        if times.len() != values.len() {
            return Err(TrailerError::animation(format!(
                "keyframe times ({}) and values ({}) differ in length",
                times.len(),
                values.len()
            )));
        }
        let keys = times
            .iter()
            .zip(values)
            .map(|(&at, value)| Keyframe { at, value, ease })
            .collect();
        let kf = Self { keys };
        kf.validate()?;
        Ok(kf)
    }

    pub fn first(&self) -> Option<&T> {
        self.keys.first().map(|k| &k.value)
    }

    pub fn last(&self) -> Option<&T> {
        self.keys.last().map(|k| &k.value)
    }

    pub fn validate(&self) -> TrailerResult<()> {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return Err(TrailerError::animation("keyframes must have at least one key"));
        };
        if first.at != 0.0 || last.at != 1.0 {
            return Err(TrailerError::animation(
                "keyframes must start at 0 and end at 1",
            ));
        }
        if !self.keys.windows(2).all(|w| w[0].at <= w[1].at) {
            return Err(TrailerError::animation("keyframes must be sorted by position"));
        }
        Ok(())
    }

    /// Sample the track at normalized progress `p`.
    ///
    /// `p` outside `[0, 1]` (ease overshoot) extrapolates along the outer segment.
    pub fn sample(&self, p: f64) -> TrailerResult<T> {
        let n = self.keys.len();
        match n {
            0 => return Err(TrailerError::animation("keyframes has no keys")),
            1 => return Ok(self.keys[0].value.clone()),
            _ => {}
        }

        let idx = self.keys.partition_point(|k| k.at <= p).clamp(1, n - 1);
        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.at - a.at;
        if span <= 0.0 {
            return Ok(b.value.clone());
        }

        let local = (p - a.at) / span;
        let shaped = if (0.0..=1.0).contains(&local) {
            a.ease.apply(local)
        } else {
            local
        };
        Ok(T::lerp(&a.value, &b.value, shaped))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
