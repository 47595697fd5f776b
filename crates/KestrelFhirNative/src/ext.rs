//! Extension side-channel plumbing.
//!
//! The native parser does not inline extensions into records. Each record's
//! header carries an anchor reference to a linked list of nodes, one node
//! per extended field, and each node holds the field's element name plus a
//! packed array of references to `Extension` records. The generated decoding
//! routines walk this chain after the ordinary fields and route each decoded
//! extension onto the element it annotates.

use kestrel_fhir_lib::r4::{Extension, HasExtensions};

use crate::arena::{NativeArena, NativeRef, StructView};
use crate::layout::RECORD_EXT_OFFSET;

/// Node layout: element name span, item count, items reference, next node.
pub const NODE_NAME_OFFSET: u32 = 0;
pub const NODE_COUNT_OFFSET: u32 = 8;
pub const NODE_ITEMS_OFFSET: u32 = 12;
pub const NODE_NEXT_OFFSET: u32 = 16;
pub const NODE_SIZE: u32 = 20;

/// One node of a record's extension chain.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionNode<'a> {
    view: StructView<'a>,
}

impl<'a> ExtensionNode<'a> {
    /// Element name this node's extensions annotate.
    pub fn name(&self) -> &'a str {
        self.view.str_span(NODE_NAME_OFFSET).unwrap_or("")
    }

    /// References to the `Extension` records attached to the element.
    pub fn items(&self) -> Items<'a> {
        Items {
            items: self.view.array(NODE_ITEMS_OFFSET),
            count: self.view.count(NODE_COUNT_OFFSET),
            index: 0,
        }
    }
}

/// Iterator over one node's extension record references.
#[derive(Debug, Clone)]
pub struct Items<'a> {
    items: Option<StructView<'a>>,
    count: u32,
    index: u32,
}

impl Iterator for Items<'_> {
    type Item = NativeRef;

    fn next(&mut self) -> Option<NativeRef> {
        let items = self.items?;
        if self.index >= self.count {
            return None;
        }
        let reference = items.reference(self.index * 4);
        self.index += 1;
        Some(reference)
    }
}

/// Iterator over a record's extension chain.
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    arena: &'a NativeArena,
    next: NativeRef,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = ExtensionNode<'a>;

    fn next(&mut self) -> Option<ExtensionNode<'a>> {
        let view = self.arena.view(self.next)?;
        self.next = view.reference(NODE_NEXT_OFFSET);
        Some(ExtensionNode { view })
    }
}

/// Walks the extension chain anchored in a record's header.
pub fn nodes<'a>(arena: &'a NativeArena, record: &StructView<'a>) -> Nodes<'a> {
    Nodes {
        arena,
        next: record.reference(RECORD_EXT_OFFSET),
    }
}

/// Attaches an extension to a scalar element, materializing an empty
/// element first when the value itself was absent.
pub fn attach<T>(slot: &mut Option<T>, extension: Extension)
where
    T: HasExtensions + Default,
{
    slot.get_or_insert_with(T::default)
        .extensions_mut()
        .get_or_insert_with(Vec::new)
        .push(extension);
}

/// Attaches an extension to a repeated element by appending an
/// extension-only item.
pub fn attach_item<T>(list: &mut Option<Vec<T>>, extension: Extension)
where
    T: HasExtensions + Default,
{
    let mut item = T::default();
    item.extensions_mut()
        .get_or_insert_with(Vec::new)
        .push(extension);
    list.get_or_insert_with(Vec::new).push(item);
}

/// Attaches an extension to a choice variant only when that variant was
/// materialized; hands the extension back otherwise so the caller can try
/// the next variant.
pub fn attach_existing<T>(slot: &mut Option<T>, extension: Extension) -> Option<Extension>
where
    T: HasExtensions,
{
    match slot {
        Some(value) => {
            value
                .extensions_mut()
                .get_or_insert_with(Vec::new)
                .push(extension);
            None
        }
        None => Some(extension),
    }
}
