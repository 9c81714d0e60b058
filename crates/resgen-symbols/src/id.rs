//! Identifier allocation
//!
//! Provides [`IdAllocator`], the per-type counter behind every resource id.
//! Ids are packed as `0x7f` (package byte), type index + 1, then a 16-bit
//! per-type sequence number starting at 1.

use crate::error::SymbolError;
use crate::resource_type::ResourceType;

/// Package byte of every allocated id
pub const PACKAGE_ID: u32 = 0x7f;

/// Largest per-type sequence number that fits an id
pub const MAX_SEQUENCE: u32 = 0xffff;

/// Sequential id allocator
///
/// One counter per [`ResourceType`]. Owned by a single parse or merge
/// operation and passed explicitly; there is no shared or global state.
///
/// # Example
/// ```
/// use resgen_symbols::{IdAllocator, ResourceType};
///
/// let mut ids = IdAllocator::new();
/// assert_eq!(ids.next(ResourceType::Attr)?, "0x7f040001");
/// assert_eq!(ids.next(ResourceType::Attr)?, "0x7f040002");
/// assert_eq!(ids.next(ResourceType::Anim)?, "0x7f010001");
/// # Ok::<(), resgen_symbols::SymbolError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    counters: [u32; ResourceType::ALL.len()],
}

impl IdAllocator {
    /// Create allocator with every counter at zero
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next packed id for `resource_type`
    ///
    /// # Errors
    /// Returns [`SymbolError::IdsExhausted`] once all [`MAX_SEQUENCE`] ids of
    /// the type are handed out, and on every later call for that type
    pub fn next_raw(&mut self, resource_type: ResourceType) -> Result<u32, SymbolError> {
        let counter = &mut self.counters[resource_type.index()];
        let id = pack(resource_type, *counter + 1).ok_or(SymbolError::IdsExhausted(resource_type))?;
        *counter += 1;
        Ok(id)
    }

    /// Next id for `resource_type`, formatted as `0x%08x`
    ///
    /// # Errors
    /// See [`IdAllocator::next_raw`]
    pub fn next(&mut self, resource_type: ResourceType) -> Result<String, SymbolError> {
        self.next_raw(resource_type).map(format_id)
    }

    /// Number of ids handed out for `resource_type`
    #[inline]
    #[must_use]
    pub fn allocated(&self, resource_type: ResourceType) -> u32 {
        self.counters[resource_type.index()]
    }
}

/// Pack a type and sequence number into an id
///
/// `None` if `sequence` is outside `1..=MAX_SEQUENCE`.
#[inline]
#[must_use]
pub fn pack(resource_type: ResourceType, sequence: u32) -> Option<u32> {
    if sequence == 0 || sequence > MAX_SEQUENCE {
        return None;
    }
    // Index is < 24 by construction.
    let type_byte = resource_type.index() as u32 + 1;
    Some((PACKAGE_ID << 24) | (type_byte << 16) | sequence)
}

/// Render an id the way symbol files carry it
#[inline]
#[must_use]
pub fn format_id(id: u32) -> String {
    format!("{id:#010x}")
}
