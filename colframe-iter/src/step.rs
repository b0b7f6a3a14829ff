//! Lock-step iteration over several columns at once.

use arrow::datatypes::DataType;
use colframe_column::Column;
use colframe_result::Result;
use colframe_types::Element;
use tracing::trace;

use crate::value::{ValueIterator, new_value_iterator};

/// When a step counts as successful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepMode {
    /// A step succeeds while at least one column still has rows. Columns
    /// that ran out report `exists == false` and a null value.
    #[default]
    Any,
    /// A step succeeds only while every column still has rows.
    Strict,
}

/// The values of one step, one slot per column.
#[derive(Debug, Clone, PartialEq)]
pub struct StepValue {
    pub values: Vec<Element>,
    pub exists: Vec<bool>,
    pub data_types: Vec<DataType>,
}

impl StepValue {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value and type of column `i`.
    pub fn value(&self, i: usize) -> (&Element, &DataType) {
        (&self.values[i], &self.data_types[i])
    }
}

/// Advances a set of value iterators together, one row per step.
#[derive(Debug)]
pub struct StepIterator {
    iterators: Vec<Box<dyn ValueIterator>>,
    exists: Vec<bool>,
    data_types: Vec<DataType>,
    mode: StepMode,
    steps: usize,
    exhausted: bool,
    current: Option<StepValue>,
}

impl StepIterator {
    /// Takes ownership of `iterators`; they are dropped with the step
    /// iterator.
    pub fn new(iterators: Vec<Box<dyn ValueIterator>>) -> Self {
        let data_types = iterators.iter().map(|it| it.data_type().clone()).collect();
        Self {
            exists: vec![false; iterators.len()],
            iterators,
            data_types,
            mode: StepMode::default(),
            steps: 0,
            exhausted: false,
            current: None,
        }
    }

    /// One value iterator per column, in the given order.
    pub fn for_columns(columns: &[Column]) -> Result<Self> {
        let iterators = columns
            .iter()
            .map(new_value_iterator)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(iterators))
    }

    pub fn with_mode(mut self, mode: StepMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    /// Number of columns stepped.
    pub fn width(&self) -> usize {
        self.iterators.len()
    }

    pub fn data_types(&self) -> &[DataType] {
        &self.data_types
    }

    /// Advance every column by one row using the configured [`StepMode`].
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        match self.mode {
            StepMode::Any => self.step(|exists| exists.iter().any(|e| *e)),
            StepMode::Strict => self.next_strict(),
        }
    }

    /// Advance every column by one row; succeeds only if every column had a
    /// row left.
    pub fn next_strict(&mut self) -> bool {
        self.step(|exists| exists.iter().all(|e| *e))
    }

    fn step(&mut self, done: impl Fn(&[bool]) -> bool) -> bool {
        self.current = None;
        for (exists, iterator) in self.exists.iter_mut().zip(&mut self.iterators) {
            *exists = iterator.next();
        }
        let advanced = !self.iterators.is_empty() && done(&self.exists);
        if advanced {
            self.steps += 1;
        }
        self.exhausted = !advanced;
        trace!(
            step = self.steps,
            advanced,
            exists = ?self.exists,
            "step iterator advanced"
        );
        advanced
    }

    /// Elements of the current step.
    ///
    /// Materialized on first access and cached until the next call to
    /// `next`. Columns that have run out contribute [`Element::Null`].
    ///
    /// # Panics
    ///
    /// Panics when called before the first successful `next` or after `next`
    /// returned `false`.
    pub fn values(&mut self) -> Result<&StepValue> {
        assert!(self.steps > 0, "step values read before the first call to next()");
        assert!(!self.exhausted, "step values read after the iterator was exhausted");
        let current = match self.current.take() {
            Some(current) => current,
            None => StepValue {
                values: self
                    .iterators
                    .iter()
                    .zip(&self.exists)
                    .map(|(iterator, exists)| {
                        if *exists {
                            iterator.value_as_element()
                        } else {
                            Ok(Element::Null)
                        }
                    })
                    .collect::<Result<Vec<_>>>()?,
                exists: self.exists.clone(),
                data_types: self.data_types.clone(),
            },
        };
        Ok(self.current.insert(current))
    }

    /// Element of column `i` at the current step.
    pub fn value_at(&mut self, i: usize) -> Result<&Element> {
        Ok(&self.values()?.values[i])
    }

    /// Whether column `i` produced a row at the current step.
    pub fn exists(&self, i: usize) -> bool {
        self.exists[i]
    }
}
