use std::fmt;

/// Array-backed binary min-heap used to pick the two lightest subtrees.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    pub elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap { elements: vec![] }
    }

    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    // zero-based layout: children of i live at 2i+1 and 2i+2
    pub fn parent(&self, i: usize) -> usize {
        i.saturating_sub(1) / 2
    }

    pub fn left(&self, i: usize) -> usize {
        2 * i + 1
    }

    pub fn right(&self, i: usize) -> usize {
        2 * i + 2
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeapErr {
    KeyError(usize, usize),
    HeapUnderflow,
}

impl fmt::Display for HeapErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapErr::KeyError(i, size) => write!(f, "index {} out of heap of size {}", i, size),
            HeapErr::HeapUnderflow => write!(f, "extract from empty heap"),
        }
    }
}

impl std::error::Error for HeapErr {}

impl<T: Ord> MinHeap<T> {
    pub fn build(source: Vec<T>) -> Result<Self, HeapErr> {
        let mut heap = MinHeap { elements: source };
        let n = heap.heap_size();
        for i in (0..n / 2).rev() {
            heap.min_heapify(i)?;
        }
        Ok(heap)
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size()).all(|i| self.elements[self.parent(i)] <= self.elements[i])
    }

    pub fn min_heapify(&mut self, mut i: usize) -> Result<(), HeapErr> {
        if i >= self.heap_size() {
            return Err(HeapErr::KeyError(i, self.heap_size()));
        }
        loop {
            let l = self.left(i);
            let r = self.right(i);
            let mut smallest = i;

            if l < self.heap_size() && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < self.heap_size() && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                return Ok(());
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        let mut i = self.heap_size() - 1;
        while i > 0 {
            let p = self.parent(i);
            if self.elements[p] <= self.elements[i] {
                break;
            }
            self.elements.swap(i, p);
            i = p;
        }
        debug_assert!(self.valid_min_heap());
    }

    pub fn extract_min(&mut self) -> Result<T, HeapErr> {
        if self.heap_size() < 1 {
            return Err(HeapErr::HeapUnderflow);
        }
        let n = self.heap_size() - 1;
        self.elements.swap(0, n);
        let result = self.elements.remove(n);
        if !self.elements.is_empty() {
            self.min_heapify(0)?;
        }
        Ok(result)
    }

    /// Takes the last remaining element out of the heap.
    pub fn into_single(mut self) -> Result<T, HeapErr> {
        match self.heap_size() {
            1 => self.extract_min(),
            0 => Err(HeapErr::HeapUnderflow),
            n => Err(HeapErr::KeyError(1, n)),
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
