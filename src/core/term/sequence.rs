//! Structured sequence events produced by the scanner

/// Family of a recognized control structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    /// A single C0 control character; `final_byte` holds its code.
    Control,
    /// `ESC [intermediates] final`, also produced for 8-bit C1 controls.
    Escape,
    Csi,
    Osc,
    Dcs,
}

/// One numeric parameter. Omitted fields stay `Default` so the handler can
/// pick its own default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
    Default,
    Value(u16),
}

impl Param {
    pub fn or(self, default: u16) -> u16 {
        match self {
            Param::Default => default,
            Param::Value(v) => v,
        }
    }
}

/// How a string payload was ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminator {
    /// `ESC \` or 8-bit ST
    St,
    /// Legacy BEL
    Bel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceEvent {
    pub kind: SequenceKind,
    pub params: Vec<Param>,
    /// Parallel to `params`: true where the field followed a ':' separator
    pub sub_params: Vec<bool>,
    /// Private parameter marker (`<`, `=`, `>`, `?`) leading the parameters
    pub private: Option<u8>,
    pub intermediates: Vec<u8>,
    pub final_byte: u8,
    /// OSC/DCS payload
    pub payload: String,
    pub terminator: Option<Terminator>,
}

impl SequenceEvent {
    pub fn control(byte: u8) -> Self {
        Self {
            kind: SequenceKind::Control,
            params: Vec::new(),
            sub_params: Vec::new(),
            private: None,
            intermediates: Vec::new(),
            final_byte: byte,
            payload: String::new(),
            terminator: None,
        }
    }

    pub fn escape(intermediates: &[u8], final_byte: u8) -> Self {
        Self {
            kind: SequenceKind::Escape,
            intermediates: intermediates.to_vec(),
            final_byte,
            ..Self::control(0)
        }
    }

    /// Parameter `index`, falling back to `default` when omitted or absent.
    pub fn param(&self, index: usize, default: u16) -> u16 {
        self.params
            .get(index)
            .copied()
            .unwrap_or(Param::Default)
            .or(default)
    }

    /// Like [`param`](Self::param), but an explicit 0 also means `default`.
    /// Cursor movement and editing counts work this way.
    pub fn count(&self, index: usize, default: u16) -> u16 {
        match self.param(index, default) {
            0 => default,
            n => n,
        }
    }

    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Parameters grouped as each main field followed by its ':' sub-fields.
    pub fn param_groups(&self) -> Vec<&[Param]> {
        let mut groups = Vec::new();
        let mut start = 0;
        for i in 1..=self.params.len() {
            let sub = self.sub_params.get(i).copied().unwrap_or(false);
            if i == self.params.len() || !sub {
                groups.push(&self.params[start..i]);
                start = i;
            }
        }
        groups
    }
}

/// Output of the scanner: a printable run or a complete sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Print(String),
    Sequence(SequenceEvent),
}
