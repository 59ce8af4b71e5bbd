//! Scalar compression engine.
//!
//! Reference round function and message schedule, written once against
//! [`Word`] so that the vector engine runs the same code over lane words.
//! Every other engine must reproduce these results bit for bit.
//!
//! The schedule buffer holds `w[t] + K[t]` after [`schedule`]; the constants
//! are folded in ahead of the rounds so precomputed pad schedules can skip
//! both expansion and the constant addition.

use crate::variant::{Family, Rotations, Sha};
use crate::word::{ByteArray, Scalar, Word, WordArray};

#[inline(always)]
fn choice<X: Word>(x: X, y: X, z: X) -> X {
    x.and(y.xor(z)).xor(z)
}

#[inline(always)]
fn majority<X: Word>(x: X, y: X, z: X) -> X {
    x.and(y).or(z.and(x.or(y)))
}

#[inline(always)]
fn parity<X: Word>(x: X, y: X, z: X) -> X {
    x.xor(y).xor(z)
}

#[inline(always)]
fn big_sigma<X: Word>(x: X, r: [u32; 3]) -> X {
    x.rotr(r[0]).xor(x.rotr(r[1])).xor(x.rotr(r[2]))
}

#[inline(always)]
fn small_sigma<X: Word>(x: X, r: [u32; 3]) -> X {
    x.rotr(r[0]).xor(x.rotr(r[1])).xor(x.shr(r[2]))
}

/// Loads a block into the first sixteen schedule words (big-endian).
#[inline]
pub fn input<S: Sha>(buffer: &mut S::Buffer<S::Word>, block: &S::Block) {
    let bytes = <S::Word as Scalar>::BYTES;
    for (word, chunk) in buffer
        .words_mut()
        .iter_mut()
        .zip(block.as_ref().chunks_exact(bytes))
    {
        *word = S::Word::from_be_slice(chunk);
    }
}

/// Loads a half-block into the first eight schedule words (big-endian).
#[inline]
pub fn input_half<S: Sha>(buffer: &mut S::Buffer<S::Word>, half: &S::Half) {
    let bytes = <S::Word as Scalar>::BYTES;
    for (word, chunk) in buffer
        .words_mut()
        .iter_mut()
        .zip(half.as_ref().chunks_exact(bytes))
    {
        *word = S::Word::from_be_slice(chunk);
    }
}

/// Expands words `16..ROUNDS` from the first sixteen.
#[inline(always)]
pub fn expand<S: Sha, X: Word<Scalar = S::Word>>(buffer: &mut S::Buffer<X>) {
    let w = buffer.words_mut();
    debug_assert_eq!(w.len(), S::ROUNDS);
    match S::FAMILY {
        Family::Sha1 => {
            for t in 16..S::ROUNDS {
                w[t] = w[t - 3].xor(w[t - 8]).xor(w[t - 14]).xor(w[t - 16]).rotl(1);
            }
        }
        Family::Sha2(r) => {
            for t in 16..S::ROUNDS {
                w[t] = small_sigma(w[t - 2], r.small1)
                    .add(w[t - 7])
                    .add(small_sigma(w[t - 15], r.small0))
                    .add(w[t - 16]);
            }
        }
    }
}

/// Adds the round constants into an expanded buffer.
#[inline(always)]
pub fn add_constants<S: Sha, X: Word<Scalar = S::Word>>(buffer: &mut S::Buffer<X>) {
    for (w, &k) in buffer.words_mut().iter_mut().zip(S::K.words()) {
        *w = w.add(X::splat(k));
    }
}

/// Expands the schedule and folds in the round constants.
#[inline(always)]
pub fn schedule<S: Sha, X: Word<Scalar = S::Word>>(buffer: &mut S::Buffer<X>) {
    expand::<S, X>(buffer);
    add_constants::<S, X>(buffer);
}

/// Runs every round over a scheduled buffer and adds the prior state
/// (Davies-Meyer).
#[inline(always)]
pub fn compress<S: Sha, X: Word<Scalar = S::Word>>(state: &mut S::State<X>, buffer: &S::Buffer<X>) {
    match S::FAMILY {
        Family::Sha1 => sha1_rounds(state.words_mut(), buffer.words()),
        Family::Sha2(r) => sha2_rounds(state.words_mut(), buffer.words(), &r),
    }
}

#[inline(always)]
fn sha1_rounds<X: Word>(state: &mut [X], w: &[X]) {
    debug_assert_eq!(state.len(), 5);
    let (mut a, mut b, mut c, mut d, mut e) = (state[0], state[1], state[2], state[3], state[4]);

    for (t, &wk) in w.iter().enumerate() {
        let f = match t / 20 {
            0 => choice(b, c, d),
            2 => majority(b, c, d),
            _ => parity(b, c, d),
        };
        let temp = a.rotl(5).add(f).add(e).add(wk);
        e = d;
        d = c;
        c = b.rotl(30);
        b = a;
        a = temp;
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, e]) {
        *s = s.add(v);
    }
}

#[inline(always)]
fn sha2_rounds<X: Word>(state: &mut [X], w: &[X], r: &Rotations) {
    debug_assert_eq!(state.len(), 8);
    let (mut a, mut b, mut c, mut d) = (state[0], state[1], state[2], state[3]);
    let (mut e, mut f, mut g, mut h) = (state[4], state[5], state[6], state[7]);

    for &wk in w {
        let t1 = h
            .add(big_sigma(e, r.big1))
            .add(choice(e, f, g))
            .add(wk);
        let t2 = big_sigma(a, r.big0).add(majority(a, b, c));
        h = g;
        g = f;
        f = e;
        e = d.add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.add(t2);
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *s = s.add(v);
    }
}

/// Serializes the state big-endian, truncated to the digest length.
#[inline]
pub fn output<S: Sha>(state: &S::State<S::Word>) -> S::Digest {
    let mut digest = S::Digest::zeroed();
    let bytes = <S::Word as Scalar>::BYTES;
    let mut words = [0u8; 8];
    for (chunk, &word) in digest.as_mut().chunks_mut(bytes).zip(state.words()) {
        // The last chunk of a truncated digest (SHA-224) may be shorter than a word.
        word.write_be(&mut words[..bytes]);
        chunk.copy_from_slice(&words[..chunk.len()]);
    }
    digest
}

/// Parses a digest back into state words (the inverse of [`output`] for
/// untruncated variants).
#[inline]
pub fn state_from_digest<S: Sha>(digest: &S::Digest) -> S::State<S::Word> {
    let mut state = S::H;
    let bytes = <S::Word as Scalar>::BYTES;
    for (word, chunk) in state
        .words_mut()
        .iter_mut()
        .zip(digest.as_ref().chunks_exact(bytes))
    {
        *word = S::Word::from_be_slice(chunk);
    }
    state
}

/// Input, schedule and compress one block in the scalar engine.
#[inline]
pub fn compress_block<S: Sha>(state: &mut S::State<S::Word>, block: &S::Block) {
    let mut buffer = <S::Buffer<S::Word> as WordArray<S::Word>>::splat(S::Word::default());
    input::<S>(&mut buffer, block);
    schedule::<S, S::Word>(&mut buffer);
    compress::<S, S::Word>(state, &buffer);
}
