use log::{info, warn};

use crate::{
    color::DyeColor,
    connection::{
        connection_type::ConnectionType, error::PayloadError, keys, pattern::canonical_record,
        payload::Payload,
    },
    item::ItemStack,
    record::Compound,
};

use super::fallback::{self, FallbackColor};

/// Result of inspecting a held connection item before it is used.
#[derive(Clone, Debug, PartialEq)]
pub enum Inspection {
    /// The payload has the expected shape; the stack may be used as-is
    Valid,
    /// The payload was corrupted and has been rebuilt. The caller must put
    /// `stack` in place of the inspected one.
    Repaired {
        stack: ItemStack,
        fallback: FallbackColor,
    },
}

/// Verifies persisted connection payloads on every read and rebuilds them from
/// the best surviving color signal when they have been stripped.
///
/// Payloads are a two-tier record: the authoritative fields (`pattern`,
/// `string`, `text`, ...) and the advisory `CapturedColor` / `CapturedRGB`
/// cache. The cache is refreshed from the authoritative tier whenever that
/// tier is intact, and is the first thing consulted when it is not.
#[derive(Clone, Debug)]
pub struct StateIntegrityGuard {
    neutral: DyeColor,
}

impl Default for StateIntegrityGuard {
    fn default() -> Self {
        Self::new(DyeColor::White)
    }
}

impl StateIntegrityGuard {
    pub fn new(neutral: DyeColor) -> Self {
        Self { neutral }
    }

    pub fn neutral(&self) -> DyeColor {
        self.neutral
    }

    pub fn validate(
        &self,
        kind: ConnectionType,
        record: Option<&Compound>,
    ) -> Result<Payload, PayloadError> {
        Payload::from_record(kind, record)
    }

    /// Checks a stack's payload. Non-connection stacks are always valid.
    pub fn inspect(&self, stack: &ItemStack) -> Inspection {
        let Some(kind) = stack.connection_type() else {
            return Inspection::Valid;
        };
        match self.validate(kind, stack.tag.as_ref()) {
            Ok(_) => Inspection::Valid,
            Err(error) => {
                warn!("{}, rebuilding the stack's payload", error);
                let (tag, fallback) = self.repair_record(kind, stack.tag.as_ref());
                Inspection::Repaired {
                    stack: ItemStack::with_tag(stack.kind.clone(), stack.count, tag),
                    fallback,
                }
            }
        }
    }

    /// Rebuilds a stack's payload unconditionally. Non-connection stacks are
    /// returned unchanged.
    pub fn repair(&self, stack: &ItemStack) -> ItemStack {
        let Some(kind) = stack.connection_type() else {
            return stack.clone();
        };
        let (tag, _) = self.repair_record(kind, stack.tag.as_ref());
        ItemStack::with_tag(stack.kind.clone(), stack.count, tag)
    }

    /// Rebuilds the canonical payload of `kind` tinted with the best fallback
    /// color found in `record`, with the captured color fields filled in so a
    /// later stripping of the pattern still leaves a signal behind.
    pub fn repair_record(
        &self,
        kind: ConnectionType,
        record: Option<&Compound>,
    ) -> (Compound, FallbackColor) {
        let fallback = fallback::resolve(record, self.neutral);
        let tint = fallback.tint();

        let mut rebuilt = canonical_record(kind, tint);
        rebuilt.insert(keys::CAPTURED_COLOR, fallback.color.name());
        rebuilt.insert(keys::CAPTURED_RGB, tint);

        info!(
            "rebuilt {} payload with color {} ({:?})",
            kind, fallback.color, fallback.source
        );
        (rebuilt, fallback)
    }

    /// Denormalizes the dominant color of a valid payload into the captured
    /// fields. Returns whether the stack changed.
    pub fn capture(&self, stack: &mut ItemStack) -> bool {
        let Some(kind) = stack.connection_type() else {
            return false;
        };
        match stack.tag.as_mut() {
            Some(record) => self.capture_record(kind, record),
            None => false,
        }
    }

    /// Idempotent: once `CapturedRGB` matches the dominant color and a name is
    /// present, the record is left alone. An existing name is kept in that
    /// case, since bucketing is lossy and a rebuilt payload may carry a name
    /// its own RGB would not bucket back to.
    pub fn capture_record(&self, kind: ConnectionType, record: &mut Compound) -> bool {
        let Ok(payload) = self.validate(kind, Some(&*record)) else {
            return false;
        };
        let Some(rgb) = payload.dominant_color() else {
            return false;
        };
        if record.get_int(keys::CAPTURED_RGB) == Some(rgb)
            && record.get_string(keys::CAPTURED_COLOR).is_some()
        {
            return false;
        }

        let color = DyeColor::bucket(rgb);
        record.insert(keys::CAPTURED_COLOR, color.name());
        record.insert(keys::CAPTURED_RGB, rgb);
        info!("captured color {} ({:#08x}) for {} payload", color, rgb, kind);
        true
    }
}
