#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioTier {
    Excellent,
    Strong,
    Fair,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeTier {
    Exceptional,
    High,
    Solid,
    Modest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityTier {
    Heavy,
    Substantial,
    Moderate,
    Light,
}

pub fn ratio_tier(ratio: f64) -> RatioTier {
    if ratio >= 2.0 {
        RatioTier::Excellent
    } else if ratio >= 1.5 {
        RatioTier::Strong
    } else if ratio >= 1.0 {
        RatioTier::Fair
    } else {
        RatioTier::Weak
    }
}

pub fn edge_tier(edge: f64) -> EdgeTier {
    if edge >= 9.0 {
        EdgeTier::Exceptional
    } else if edge >= 8.0 {
        EdgeTier::High
    } else if edge >= 7.0 {
        EdgeTier::Solid
    } else {
        EdgeTier::Modest
    }
}

pub fn complexity_tier(complexity: f64) -> ComplexityTier {
    if complexity >= 8.0 {
        ComplexityTier::Heavy
    } else if complexity >= 6.0 {
        ComplexityTier::Substantial
    } else if complexity >= 4.0 {
        ComplexityTier::Moderate
    } else {
        ComplexityTier::Light
    }
}

impl RatioTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Strong => "strong",
            Self::Fair => "fair",
            Self::Weak => "weak",
        }
    }
}

impl EdgeTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exceptional => "exceptional",
            Self::High => "high",
            Self::Solid => "solid",
            Self::Modest => "modest",
        }
    }
}

impl ComplexityTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heavy => "heavy",
            Self::Substantial => "substantial",
            Self::Moderate => "moderate",
            Self::Light => "light",
        }
    }
}
