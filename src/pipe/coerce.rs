//! Explicit accessors that run a pipe and convert the result.

use super::{Flow, Pipe};
use crate::error::CoerceError;
use std::fmt::Display;
use std::str::FromStr;

impl<T, E> Pipe<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Runs the pipe and returns the plain value.
    ///
    /// Fails with [`CoerceError::Pending`] if an async step left the value pending.
    pub fn exec_ready(&mut self) -> Result<T, CoerceError<E>> {
        match self.exec().map_err(CoerceError::Step)? {
            Flow::Ready(value) => Ok(value),
            Flow::Pending(_) => Err(CoerceError::Pending),
        }
    }

    /// Runs the pipe and renders the value with `Display`.
    pub fn exec_string(&mut self) -> Result<String, CoerceError<E>>
    where
        T: Display,
    {
        self.exec_ready().map(|value| value.to_string())
    }

    /// Runs the pipe and renders it as `Pipe(<value>)`.
    ///
    /// Unlike `Debug`, this executes queued steps first.
    pub fn exec_display(&mut self) -> Result<String, CoerceError<E>>
    where
        T: Display,
    {
        self.exec_ready().map(|value| format!("Pipe({value})"))
    }

    /// Runs the pipe and parses the rendered value as a number.
    ///
    /// ```rust
    /// use pipe_sugars::{CoerceError, Pipe};
    ///
    /// let mut pipe = Pipe::new(5);
    /// pipe.to(|x| x * 2);
    /// assert_eq!(pipe.exec_number::<f64>().ok(), Some(10.0));
    ///
    /// let mut words = Pipe::new("ten");
    /// assert!(matches!(
    ///     words.exec_number::<i64>(),
    ///     Err(CoerceError::NotNumeric { .. })
    /// ));
    /// ```
    pub fn exec_number<N>(&mut self) -> Result<N, CoerceError<E>>
    where
        T: Display,
        N: FromStr,
    {
        let input = self.exec_string()?;
        match input.trim().parse() {
            Ok(number) => Ok(number),
            Err(_) => Err(CoerceError::NotNumeric { input }),
        }
    }

    /// Runs the pipe and iterates the resulting value.
    pub fn exec_iter(&mut self) -> Result<T::IntoIter, CoerceError<E>>
    where
        T: IntoIterator,
    {
        self.exec_ready().map(IntoIterator::into_iter)
    }

    /// Runs the pipe and serializes the value to a JSON string.
    #[cfg(feature = "serde")]
    pub fn exec_json(&mut self) -> Result<String, CoerceError<E>>
    where
        T: serde::Serialize,
    {
        let value = self.exec_ready()?;
        Ok(serde_json::to_string(&value)?)
    }

    /// Runs the pipe and converts the value to a `serde_json::Value`.
    #[cfg(feature = "serde")]
    pub fn exec_json_value(&mut self) -> Result<serde_json::Value, CoerceError<E>>
    where
        T: serde::Serialize,
    {
        let value = self.exec_ready()?;
        Ok(serde_json::to_value(&value)?)
    }
}
