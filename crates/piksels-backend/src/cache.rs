//! Cache helpers.
//!
//! Backends and the core both avoid redundant device work by remembering the
//! last value they set. [`Cached`] does that for one value, and
//! [`QueryCache`] keeps backend query answers around.

use crate::BackendInfo;

/// Answers to backend queries. Each slot is filled on first query.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct QueryCache {
    author: Option<String>,
    name: Option<String>,
    version: Option<String>,
    shading_lang_version: Option<String>,
    info: Option<BackendInfo>,
}

impl QueryCache {
    pub fn author(&mut self) -> &mut Option<String> {
        &mut self.author
    }

    pub fn name(&mut self) -> &mut Option<String> {
        &mut self.name
    }

    pub fn version(&mut self) -> &mut Option<String> {
        &mut self.version
    }

    pub fn shading_lang_version(&mut self) -> &mut Option<String> {
        &mut self.shading_lang_version
    }

    pub fn info(&mut self) -> &mut Option<BackendInfo> {
        &mut self.info
    }
}

/// The last value sent to the device.
///
/// Setting a value equal to the cached one is a no-op. Side effects the cache
/// cannot see (a command buffer being reset, for instance) must be handled by
/// calling [`Cached::invalidate`].
#[derive(Clone, Debug)]
pub struct Cached<T>(Option<T>);

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Cached(None)
    }
}

impl<T> Cached<T>
where
    T: Clone + PartialEq,
{
    pub fn invalidate(&mut self) {
        self.0 = None;
    }

    /// Replaces the cached value, returning the previous one.
    pub fn set(&mut self, value: T) -> Option<T> {
        self.0.replace(value)
    }

    /// Runs `f` and caches `value` if `value` differs from the cached value.
    ///
    /// ## Returns
    ///
    /// `true` if `f` ran. If `f` fails, the cache is left invalid.
    ///
    /// ## Errors
    ///
    /// Whatever `f` returns.
    pub fn set_if_invalid<E>(
        &mut self,
        value: &T,
        f: impl FnOnce() -> Result<(), E>,
    ) -> Result<bool, E> {
        if !self.is_invalid(value) {
            return Ok(false);
        }

        self.0 = None;
        f()?;
        self.0 = Some(value.clone());
        Ok(true)
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.0.is_some()
    }

    /// Whether `value` differs from the cached value. Nothing cached counts
    /// as different.
    #[must_use]
    pub fn is_invalid(&self, value: &T) -> bool {
        self.0.as_ref() != Some(value)
    }

    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }
}
