/// Every ordering of `items`, first element varying slowest. Repeated items
/// produce repeated orderings.
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() < 2 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for (index, first) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(index);
        for tail in permutations(&rest) {
            let mut permutation = Vec::with_capacity(items.len());
            permutation.push(first.clone());
            permutation.extend(tail);
            out.push(permutation);
        }
    }
    out
}

/// Every `size`-element subset of `items`, keeping their relative order.
/// Subsets containing the first item come first.
pub fn subsets<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if items.len() < size {
        return Vec::new();
    }
    if size == 0 {
        return vec![Vec::new()];
    }
    if items.len() == size {
        return vec![items.to_vec()];
    }
    let (first, rest) = (&items[0], &items[1..]);
    let mut out: Vec<Vec<T>> = subsets(rest, size - 1)
        .into_iter()
        .map(|tail| {
            let mut subset = Vec::with_capacity(size);
            subset.push(first.clone());
            subset.extend(tail);
            subset
        })
        .collect();
    out.extend(subsets(rest, size));
    out
}

/// Number of `k`-element subsets of `n` items.
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let mut total: u128 = 1;
    for i in 1..=k as u128 {
        total = total * (n as u128 - i + 1) / i;
    }
    total
}

/// All words of a fixed length over an alphabet, in odometer order: the last
/// position changes fastest.
#[derive(Clone, Debug)]
pub struct Words<'a> {
    alphabet: &'a [char],
    digits: Vec<usize>,
    done: bool,
}

impl<'a> Words<'a> {
    pub fn new(alphabet: &'a [char], length: usize) -> Self {
        Self {
            alphabet,
            digits: vec![0; length],
            done: alphabet.is_empty() && length > 0,
        }
    }

    /// Total number of words, saturating at `u128::MAX`.
    pub fn total(alphabet: &[char], length: usize) -> u128 {
        (alphabet.len() as u128).saturating_pow(length as u32)
    }
}

impl Iterator for Words<'_> {
    type Item = Vec<char>;

    fn next(&mut self) -> Option<Vec<char>> {
        if self.done {
            return None;
        }
        let word = self.digits.iter().map(|&d| self.alphabet[d]).collect();

        self.done = true;
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.alphabet.len() {
                self.done = false;
                break;
            }
            *digit = 0;
        }
        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutations_in_lexicographic_position_order() {
        assert_eq!(
            permutations(&['a', 'b', 'c']),
            vec![
                vec!['a', 'b', 'c'],
                vec!['a', 'c', 'b'],
                vec!['b', 'a', 'c'],
                vec!['b', 'c', 'a'],
                vec!['c', 'a', 'b'],
                vec!['c', 'b', 'a'],
            ]
        );
        assert_eq!(permutations::<char>(&[]), vec![Vec::<char>::new()]);
    }

    #[test]
    fn subsets_keep_order() {
        assert_eq!(
            subsets(&[1, 2, 3, 4], 2),
            vec![
                vec![1, 2],
                vec![1, 3],
                vec![1, 4],
                vec![2, 3],
                vec![2, 4],
                vec![3, 4],
            ]
        );
        assert!(subsets(&[1], 2).is_empty());
        assert_eq!(subsets(&[1, 2], 0), vec![Vec::<i32>::new()]);
        assert_eq!(binomial(13, 2), 78);
        assert_eq!(binomial(4, 2), subsets(&[1, 2, 3, 4], 2).len() as u128);
        assert_eq!(binomial(2, 3), 0);
    }

    #[test]
    fn words_count_like_an_odometer() {
        let words: Vec<String> = Words::new(&['x', 'y'], 2)
            .map(|word| word.into_iter().collect())
            .collect();
        assert_eq!(words, vec!["xx", "xy", "yx", "yy"]);
        assert_eq!(Words::total(&['x', 'y'], 2), 4);
        assert_eq!(Words::new(&['x'], 0).count(), 1);
        assert_eq!(Words::new(&[], 0).count(), 1);
        assert_eq!(Words::new(&[], 2).count(), 0);
    }
}
