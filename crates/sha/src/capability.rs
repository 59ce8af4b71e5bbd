//! Capability descriptors and strategy profiles.
//!
//! The engine never probes the CPU. What the build was compiled for is
//! captured once in [`Capabilities::BUILD`] from `cfg!(target_feature)`
//! flags, and a [`Strategy`] type picks which engines an [`Algorithm`] may
//! use. Because the strategy is a type parameter, each (variant, strategy)
//! pair is monomorphized and the hot loops carry no runtime branching on
//! capabilities.
//!
//! Vector lanes are portable arrays, so a vector profile runs on any target;
//! the build flags only decide how well it vectorizes and which profile
//! [`Detected`] resolves to. The native engine is different: it is enabled
//! only when the strategy asks for it *and* the build provides it.
//!
//! [`Algorithm`]: crate::Algorithm

/// Boolean capability vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// Hardware SHA-256 instructions.
    pub native: bool,
    /// 128-bit vectors (SSE4.1, NEON, wasm simd128).
    pub x128: bool,
    /// 256-bit vectors (AVX2).
    pub x256: bool,
    /// 512-bit vectors (AVX-512F and AVX-512BW).
    pub x512: bool,
}

impl Capabilities {
    /// No acceleration.
    pub const NONE: Self = Self {
        native: false,
        x128: false,
        x256: false,
        x512: false,
    };

    /// What the current build was compiled for.
    pub const BUILD: Self = Self {
        native: cfg!(all(
            target_arch = "x86_64",
            target_feature = "sha",
            target_feature = "sse4.1"
        )),
        x128: cfg!(any(
            all(
                any(target_arch = "x86_64", target_arch = "x86"),
                target_feature = "sse4.1"
            ),
            all(target_arch = "aarch64", target_feature = "neon"),
            all(target_arch = "wasm32", target_feature = "simd128")
        )),
        x256: cfg!(all(
            any(target_arch = "x86_64", target_arch = "x86"),
            target_feature = "avx2"
        )),
        x512: cfg!(all(
            any(target_arch = "x86_64", target_arch = "x86"),
            target_feature = "avx512f",
            target_feature = "avx512bw"
        )),
    };

    /// Intersection of two capability vectors.
    pub const fn and(self, other: Self) -> Self {
        Self {
            native: self.native && other.native,
            x128: self.x128 && other.x128,
            x256: self.x256 && other.x256,
            x512: self.x512 && other.x512,
        }
    }

    /// Lane counts of every enabled vector width for `word_bits`-bit words,
    /// widest first. Disabled widths are zero.
    pub const fn lane_widths(self, word_bits: u32) -> [usize; 3] {
        [
            lanes(self.x512, 512, word_bits),
            lanes(self.x256, 256, word_bits),
            lanes(self.x128, 128, word_bits),
        ]
    }

    /// Widest lane count, or zero without vectors.
    pub const fn max_lanes(self, word_bits: u32) -> usize {
        let widths = self.lane_widths(word_bits);
        if widths[0] != 0 {
            widths[0]
        } else if widths[1] != 0 {
            widths[1]
        } else {
            widths[2]
        }
    }

    /// Narrowest lane count, or zero without vectors.
    pub const fn min_lanes(self, word_bits: u32) -> usize {
        let widths = self.lane_widths(word_bits);
        if widths[2] != 0 {
            widths[2]
        } else if widths[1] != 0 {
            widths[1]
        } else {
            widths[0]
        }
    }
}

const fn lanes(enabled: bool, vector_bits: u32, word_bits: u32) -> usize {
    if enabled {
        (vector_bits / word_bits) as usize
    } else {
        0
    }
}

/// Engine a call dispatches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Engine {
    /// Lane-batched software vectors.
    Vector {
        /// Lanes in the widest batch used.
        lanes: usize,
    },
    /// Hardware hash instructions, one block at a time.
    Native,
    /// Portable reference rounds.
    Scalar,
}

impl Engine {
    /// Short name used in log events and bench ids.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vector { .. } => "vector",
            Self::Native => "native",
            Self::Scalar => "scalar",
        }
    }
}

/// Compile-time engine selection.
pub trait Strategy: Copy + std::fmt::Debug + Default + Send + Sync + 'static {
    /// Profile name.
    const NAME: &'static str;
    /// Engines this profile asks for.
    const CAPS: Capabilities;
}

macro_rules! strategy {
    ($(#[$meta:meta])* $name:ident, $label:literal, $caps:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Strategy for $name {
            const NAME: &'static str = $label;
            const CAPS: Capabilities = $caps;
        }
    };
}

strategy!(
    /// Everything the build provides.
    Detected,
    "detected",
    Capabilities::BUILD
);

strategy!(
    /// Scalar rounds only.
    Portable,
    "portable",
    Capabilities::NONE
);

strategy!(
    /// Hardware instructions when the build has them, otherwise scalar.
    Native,
    "native",
    Capabilities {
        native: true,
        ..Capabilities::NONE
    }
);

strategy!(
    /// 128-bit software lanes.
    Vector128,
    "vector128",
    Capabilities {
        x128: true,
        ..Capabilities::NONE
    }
);

strategy!(
    /// 256-bit software lanes, cascading to 128-bit for tails.
    Vector256,
    "vector256",
    Capabilities {
        x128: true,
        x256: true,
        ..Capabilities::NONE
    }
);

strategy!(
    /// 512-bit software lanes, cascading to narrower widths for tails.
    Vector512,
    "vector512",
    Capabilities {
        x128: true,
        x256: true,
        x512: true,
        ..Capabilities::NONE
    }
);
