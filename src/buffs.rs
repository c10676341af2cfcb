//! One-shot buffs and the per-attempt buff transaction.
//!
//! An attempt never touches [`BuffSet`] directly. It reads a snapshot taken
//! at entry through a [`BuffTransaction`], which allows each buff to be
//! consumed at most once, and the forge commits the transaction on exit.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffKind {
    /// Negates one destroy.
    Shield,
    /// Waives one attempt's cost.
    FreeEnhance,
    /// Doubles one attempt's success rate, capped at 100%.
    Passion,
    /// Negates one downgrade.
    Blessing,
}

impl BuffKind {
    pub const ALL: [BuffKind; 4] = [
        BuffKind::Shield,
        BuffKind::FreeEnhance,
        BuffKind::Passion,
        BuffKind::Blessing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BuffKind::Shield => "Shield",
            BuffKind::FreeEnhance => "Free Enhance",
            BuffKind::Passion => "Passion",
            BuffKind::Blessing => "Blessing",
        }
    }
}

/// Pending buffs. Each flag is a latch: granting twice is the same as once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffSet {
    pub shield: bool,
    pub free_enhance: bool,
    pub passion: bool,
    pub blessing: bool,
}

impl BuffSet {
    pub fn is_active(&self, kind: BuffKind) -> bool {
        match kind {
            BuffKind::Shield => self.shield,
            BuffKind::FreeEnhance => self.free_enhance,
            BuffKind::Passion => self.passion,
            BuffKind::Blessing => self.blessing,
        }
    }

    fn flag_mut(&mut self, kind: BuffKind) -> &mut bool {
        match kind {
            BuffKind::Shield => &mut self.shield,
            BuffKind::FreeEnhance => &mut self.free_enhance,
            BuffKind::Passion => &mut self.passion,
            BuffKind::Blessing => &mut self.blessing,
        }
    }

    pub fn grant(&mut self, kind: BuffKind) {
        *self.flag_mut(kind) = true;
    }

    /// Clears the buff, returning whether it was pending.
    pub fn take(&mut self, kind: BuffKind) -> bool {
        std::mem::replace(self.flag_mut(kind), false)
    }

    pub fn active(&self) -> Vec<BuffKind> {
        BuffKind::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
            .collect()
    }
}

/// Buff reads and writes of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffTransaction {
    snapshot: BuffSet,
    consumed: Vec<BuffKind>,
    granted: Vec<BuffKind>,
}

impl BuffTransaction {
    pub fn begin(buffs: &BuffSet) -> Self {
        Self {
            snapshot: *buffs,
            consumed: Vec::new(),
            granted: Vec::new(),
        }
    }

    /// Pending at entry and not yet consumed in this transaction.
    pub fn available(&self, kind: BuffKind) -> bool {
        self.snapshot.is_active(kind) && !self.consumed.contains(&kind)
    }

    /// Consumes the buff if available. A second call for the same kind
    /// returns false.
    pub fn consume(&mut self, kind: BuffKind) -> bool {
        if !self.available(kind) {
            return false;
        }
        self.consumed.push(kind);
        true
    }

    pub fn grant(&mut self, kind: BuffKind) {
        if !self.granted.contains(&kind) {
            self.granted.push(kind);
        }
    }

    pub fn consumed(&self) -> &[BuffKind] {
        &self.consumed
    }

    pub fn granted(&self) -> &[BuffKind] {
        &self.granted
    }

    pub fn snapshot(&self) -> BuffSet {
        self.snapshot
    }

    /// Resulting buff set: consumptions are cleared first, then grants set,
    /// so a buff consumed and re-earned in one attempt ends up pending.
    pub fn apply_to(&self, buffs: &mut BuffSet) {
        for kind in &self.consumed {
            buffs.take(*kind);
        }
        for kind in &self.granted {
            buffs.grant(*kind);
        }
    }
}
