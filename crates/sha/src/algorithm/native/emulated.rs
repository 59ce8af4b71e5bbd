//! Portable model of the SHA-256 instruction set extensions.

use super::NativeOps;

#[inline(always)]
fn sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
fn sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

#[inline(always)]
fn big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline(always)]
fn big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

/// Software rendition of `sha256rnds2`, `sha256msg1`, `sha256msg2` and the
/// two SSE shuffles the engine uses.
#[derive(Clone, Copy, Debug, Default)]
pub struct Emulated;

impl NativeOps for Emulated {
    type V = [u32; 4];

    #[inline(always)]
    fn load(words: &[u32; 4]) -> Self::V {
        *words
    }

    #[inline(always)]
    fn store(v: Self::V) -> [u32; 4] {
        v
    }

    #[inline(always)]
    fn add(a: Self::V, b: Self::V) -> Self::V {
        std::array::from_fn(|i| a[i].wrapping_add(b[i]))
    }

    fn rnds2(cdgh: Self::V, abef: Self::V, wk: Self::V) -> Self::V {
        let [mut h, mut g, mut d, mut c] = cdgh;
        let [mut f, mut e, mut b, mut a] = abef;

        for &k in &wk[..2] {
            let t1 = h
                .wrapping_add(big_sigma1(e))
                .wrapping_add((e & f) ^ (!e & g))
                .wrapping_add(k);
            let t2 = big_sigma0(a).wrapping_add((a & b) ^ (a & c) ^ (b & c));
            h = g;
            g = f;
            f = e;
            e = d.wrapping_add(t1);
            d = c;
            c = b;
            b = a;
            a = t1.wrapping_add(t2);
        }

        [f, e, b, a]
    }

    fn msg1(a: Self::V, b: Self::V) -> Self::V {
        [
            a[0].wrapping_add(sigma0(a[1])),
            a[1].wrapping_add(sigma0(a[2])),
            a[2].wrapping_add(sigma0(a[3])),
            a[3].wrapping_add(sigma0(b[0])),
        ]
    }

    fn msg2(a: Self::V, b: Self::V) -> Self::V {
        let w16 = a[0].wrapping_add(sigma1(b[2]));
        let w17 = a[1].wrapping_add(sigma1(b[3]));
        let w18 = a[2].wrapping_add(sigma1(w16));
        let w19 = a[3].wrapping_add(sigma1(w17));
        [w16, w17, w18, w19]
    }

    #[inline(always)]
    fn alignr4(hi: Self::V, lo: Self::V) -> Self::V {
        [lo[1], lo[2], lo[3], hi[0]]
    }

    #[inline(always)]
    fn swap_high(v: Self::V) -> Self::V {
        [v[2], v[3], v[0], v[1]]
    }
}
