/// Border extension policies for samples outside the filtered domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Leave border output positions untouched; the caller pre-fills or
    /// ignores them.
    NoBoundary,

    /// Out-of-range samples read as zero.
    Zero,

    /// Reflect at both domain edges, edge sample included (period 2N).
    Mirror,

    /// Wrap around periodically (modulo N).
    Periodic,

    /// Clamp to the nearest edge sample.
    Constant,
}

/// Outcome of resolving a possibly out-of-range index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// The sample at this in-domain index is read.
    Inside(usize),
    /// The sample is synthesized as zero.
    Zero,
    /// The whole output position is skipped.
    Skip,
}

/// Resolve index `idx` against the domain `[0, len)` under `boundary`.
///
/// Both border sides and the oversized-kernel fallback route through this
/// single function, so left and right borders are guaranteed to use the
/// same mirror arithmetic.
pub fn resolve_index(idx: isize, len: usize, boundary: Boundary) -> Resolved {
    let n = len as isize;
    if idx >= 0 && idx < n {
        return Resolved::Inside(idx as usize);
    }
    if n == 0 {
        return Resolved::Skip;
    }
    match boundary {
        Boundary::NoBoundary => Resolved::Skip,
        Boundary::Zero => Resolved::Zero,
        Boundary::Mirror => Resolved::Inside(mirror_index(idx, n)),
        Boundary::Periodic => Resolved::Inside(idx.rem_euclid(n) as usize),
        Boundary::Constant => Resolved::Inside(idx.clamp(0, n - 1) as usize),
    }
}

/// Edge-inclusive reflection, iterated so overhangs past one domain width
/// fold back correctly (period 2N).
fn mirror_index(mut idx: isize, n: isize) -> usize {
    loop {
        if idx < 0 {
            idx = -idx - 1;
        } else if idx >= n {
            idx = 2 * n - idx - 1;
        } else {
            return idx as usize;
        }
    }
}
