//! Units for scarce resources, such as textures and uniform buffers.
//!
//! A device only has so many units to bind scarce resources to. [`Units`]
//! hands them out and recycles the ones no scope uses anymore. A recycled unit
//! remembers which resource is still bound to it, so that binding that
//! resource again costs nothing.

use std::collections::{BTreeMap, HashMap};

use piksels_backend::{Backend, Error, Unit};

/// A unit handed out by [`Units::get_unit`].
#[derive(Debug, Eq, PartialEq)]
pub struct UnitBindingPoint<B>
where
    B: Backend,
{
    pub unit: B::Unit,

    /// Whether the requested resource is already bound to the unit, in which
    /// case there is no need to bind it again.
    pub already_bound: bool,
}

#[derive(Debug)]
pub struct Units<B>
where
    B: Backend,
{
    next_unit: B::Unit,
    max_unit: B::Unit,

    // units used by live scopes, with the number of scopes using them
    in_use: HashMap<B::ScarceIndex, (B::Unit, usize)>,

    // units nothing uses anymore, along with the resource still bound to them
    idle_units: BTreeMap<B::Unit, B::ScarceIndex>,
}

impl<B> Units<B>
where
    B: Backend,
{
    /// `max_unit` is exclusive.
    pub fn new(max_unit: B::Unit) -> Self {
        Self {
            next_unit: B::Unit::default(),
            max_unit,
            in_use: HashMap::new(),
            idle_units: BTreeMap::new(),
        }
    }

    /// Gets a unit to bind the resource identified by `scarce_index` to.
    ///
    /// In order of preference, the unit is:
    ///
    /// 1. the unit the resource is currently bound to, either in use or idle;
    /// 2. a never used unit;
    /// 3. the smallest idle unit.
    ///
    /// ## Errors
    ///
    /// [`Error::NoMoreUnits`] if every unit is in use.
    pub fn get_unit(&mut self, scarce_index: &B::ScarceIndex) -> Result<UnitBindingPoint<B>, Error> {
        if let Some((unit, users)) = self.in_use.get_mut(scarce_index) {
            *users += 1;
            return Ok(UnitBindingPoint {
                unit: unit.clone(),
                already_bound: true,
            });
        }

        let idle = self
            .idle_units
            .iter()
            .find_map(|(unit, index)| (index == scarce_index).then(|| unit.clone()));

        if let Some(unit) = idle {
            self.idle_units.remove(&unit);
            return Ok(self.acquire(scarce_index, unit, true));
        }

        if self.next_unit < self.max_unit {
            let unit = self.next_unit.clone();
            self.next_unit.next_unit();
            return Ok(self.acquire(scarce_index, unit, false));
        }

        match self.idle_units.pop_first() {
            Some((unit, previous)) => {
                log::trace!("recycling unit {unit:?}, evicting {previous:?}");
                Ok(self.acquire(scarce_index, unit, false))
            }
            None => Err(Error::NoMoreUnits),
        }
    }

    fn acquire(
        &mut self,
        scarce_index: &B::ScarceIndex,
        unit: B::Unit,
        already_bound: bool,
    ) -> UnitBindingPoint<B> {
        self.in_use.insert(scarce_index.clone(), (unit.clone(), 1));

        UnitBindingPoint {
            unit,
            already_bound,
        }
    }

    /// Gives back a unit obtained for `scarce_index`. Once every user gave it
    /// back, the unit goes idle.
    pub fn release(&mut self, scarce_index: &B::ScarceIndex) {
        let Some((unit, users)) = self.in_use.get_mut(scarce_index) else {
            return;
        };

        *users -= 1;
        if *users == 0 {
            let unit = unit.clone();
            self.in_use.remove(scarce_index);
            self.idle(unit, scarce_index.clone());
        }
    }

    /// Marks `unit` idle, with `scarce_index` still bound to it.
    pub fn idle(&mut self, unit: B::Unit, scarce_index: B::ScarceIndex) {
        self.idle_units.insert(unit, scarce_index);
    }

    #[must_use]
    pub fn in_use_len(&self) -> usize {
        self.in_use.len()
    }

    #[must_use]
    pub fn idle_len(&self) -> usize {
        self.idle_units.len()
    }
}
