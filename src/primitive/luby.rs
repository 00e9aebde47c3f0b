use std::fmt;

/// The `i`-th element of the Luby sequence:
/// `t(i) = 2^(k-1)` if `i = 2^k - 1`, otherwise `t(i - 2^(k-1) + 1)`.
/// `luby(0)` is defined as 1.
///
/// ```
/// use uipsat::primitive::luby;
/// assert_eq!((1..=7).map(luby).collect::<Vec<_>>(), vec![1, 1, 2, 1, 1, 2, 4]);
/// ```
pub fn luby(mut i: usize) -> usize {
    while i != 0 {
        // the smallest `2^k` with `i <= 2^k - 1`
        let kpow = (i + 1).next_power_of_two();
        if i == kpow - 1 {
            return kpow / 2;
        }
        i = i - kpow / 2 + 1;
    }
    1
}

/// An iterator over the Luby sequence from `luby(1)`.
#[derive(Clone, Debug, Default)]
pub struct LubySeries {
    index: usize,
    max_value: usize,
}

impl fmt::Display for LubySeries {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Luby[index:{}]", self.index)
    }
}

impl Iterator for LubySeries {
    type Item = usize;
    fn next(&mut self) -> Option<usize> {
        self.index += 1;
        let val = luby(self.index);
        if self.max_value < val {
            self.max_value = val;
        }
        Some(val)
    }
}

impl LubySeries {
    pub fn max_value(&self) -> usize {
        self.max_value
    }
    pub fn reset(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luby_series() {
        let mut luby = LubySeries::default();
        let v = vec![1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8];
        let l = v.iter().map(|_| luby.next().unwrap()).collect::<Vec<usize>>();
        assert_eq!(l, v);
        assert_eq!(luby.max_value(), 8);
        luby.reset();
        assert_eq!(luby.next(), Some(1));
    }

    #[test]
    fn test_luby_origin() {
        assert_eq!(luby(0), 1);
        assert_eq!(luby(31), 16);
        assert_eq!(luby(32), 1);
    }
}
