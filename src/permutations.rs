/**
  An iterator over every ordering of a set of items, in lexicographic order of the items'
  original positions. For `n` items it yields `n!` permutations; for no items it yields a single
  empty permutation.

  The iterator permutes a vector of indices in place and clones items out of the source on each
  step, so the source itself is never reordered.
*/
#[derive(Debug, Clone)]
pub struct Permutations<T> where T: Clone {
  items   : Vec<T>,
  indices : Vec<usize>, // The current ordering, as positions in `items`.
  started : bool,
  done    : bool,
}

impl<T> Permutations<T> where T: Clone {
  pub fn new(items: &[T]) -> Permutations<T> {
    Permutations {
      items   : items.to_vec(),
      indices : (0..items.len()).collect(),
      started : false,
      done    : false,
    }
  }
}

impl<T> Iterator for Permutations<T> where T: Clone {
  type Item = Vec<T>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }

    match self.started {
      false => self.started = true,
      true  => {
        if !advance(&mut self.indices) {
          self.done = true;
          return None;
        }
      }
    }

    Some(self.indices.iter().map(|&i| self.items[i].clone()).collect())
  }
}

/// Rearranges `indices` into the next greater ordering. Returns `false` if it was the last one.
fn advance(indices: &mut [usize]) -> bool {
  if indices.len() < 2 {
    return false;
  }

  // Find the longest non-increasing suffix; the element before it is the pivot.
  let mut i = indices.len() - 1;
  while i > 0 && indices[i - 1] >= indices[i] {
    i -= 1;
  }
  if i == 0 {
    return false;
  }

  // Swap the pivot with the rightmost element that exceeds it, then reverse the suffix.
  let mut j = indices.len() - 1;
  while indices[j] <= indices[i - 1] {
    j -= 1;
  }
  indices.swap(i - 1, j);
  indices[i..].reverse();
  true
}
