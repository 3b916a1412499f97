//! Element structures for the GPX tree.
//!
//! Every node of a GPX document is an [`ElementInner`] held behind an
//! [`ElementRef`]. Ownership runs from parent to children through strong
//! references; the link back to the parent is a [`WeakElementRef`], so
//! dropping the holder of the root releases the whole tree.
//!
//! Children are only ever added, removed or moved through the associated
//! functions on [`ElementInner`] that take the parent reference. Those keep
//! the child collection and the child's parent link in step, and refuse any
//! edit that would give a node two parents or close a cycle.

mod kind;

pub use kind::{ElementData, ElementKind, ElementType, GpxElement, Slot};

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::error::{Error, Result};
use crate::render::{self, RenderOptions};

/// Global counter for generating unique element IDs.
static ELEMENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_element_id() -> u64 {
    ELEMENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A reference-counted pointer to an element.
pub type ElementRef = Rc<RefCell<ElementInner>>;

/// A non-owning reference to an element, used for parent links.
pub type WeakElementRef = Weak<RefCell<ElementInner>>;

/// Creates a new detached element wrapped in an [`ElementRef`].
pub fn new_element(kind: impl Into<ElementKind>) -> ElementRef {
    Rc::new(RefCell::new(ElementInner::new(kind.into())))
}

/// The inner data of an element in the GPX tree.
#[derive(Debug)]
pub struct ElementInner {
    /// Unique identifier for this element.
    id: u64,
    /// Child elements, always kept in schema slot order.
    children: Vec<ElementRef>,
    /// Weak reference to the parent element.
    parent: WeakElementRef,
    /// Zero-based position among siblings (-1 when detached).
    child_pos: i32,
    /// Kind-specific data.
    kind: ElementKind,
}

impl ElementInner {
    /// Creates a new detached element.
    pub fn new(kind: ElementKind) -> Self {
        ElementInner {
            id: next_element_id(),
            children: Vec::new(),
            parent: Weak::new(),
            child_pos: -1,
            kind,
        }
    }

    /// Returns the unique ID of this element.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the kind-specific data.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Returns the concrete data of this element if it is a `T`.
    pub fn data<T: ElementData>(&self) -> Option<&T> {
        T::from_kind(&self.kind)
    }

    /// Returns the concrete data of this element mutably if it is a `T`.
    ///
    /// The element type itself never changes through this reference, so the
    /// parent's slot bookkeeping stays valid.
    pub fn data_mut<T: ElementData>(&mut self) -> Option<&mut T> {
        T::from_kind_mut(&mut self.kind)
    }

    /// Replaces the kind-specific data with data of the same element type.
    pub fn set_kind(&mut self, kind: ElementKind) -> Result<()> {
        if kind.element_type() != self.kind.element_type() {
            return Err(Error::structural(format!(
                "cannot change <{}> into <{}>",
                self.kind.element_type().name(),
                kind.element_type().name()
            )));
        }
        self.kind = kind;
        Ok(())
    }

    /// Returns the element type.
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns a reference to the child at the given index.
    pub fn child(&self, index: usize) -> Option<&ElementRef> {
        self.children.get(index)
    }

    /// Returns the children as a slice.
    pub fn children(&self) -> &[ElementRef] {
        &self.children
    }

    /// Returns the children of the given type, in document order.
    pub fn children_of_type(&self, element_type: ElementType) -> Vec<ElementRef> {
        self.children
            .iter()
            .filter(|c| c.borrow().element_type() == element_type)
            .cloned()
            .collect()
    }

    /// Returns the parent element, if it is set and still alive.
    pub fn parent(&self) -> Option<ElementRef> {
        self.parent.upgrade()
    }

    /// Returns true if this element has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.strong_count() == 0
    }

    /// Stores the parent link.
    ///
    /// Only the structural operations below call this, right after they
    /// update the parent's child collection.
    pub(crate) fn set_parent(&mut self, parent: Option<&ElementRef>) {
        self.parent = parent.map(Rc::downgrade).unwrap_or_default();
    }

    /// Returns the child position (0-based index among siblings, -1 when detached).
    pub fn child_pos(&self) -> i32 {
        self.child_pos
    }

    /// Returns the number of parent links between this element and its root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(node) = current {
            depth += 1;
            current = node.borrow().parent();
        }
        depth
    }

    /// Renders this element and its subtree as compact GPX text.
    pub fn render(&self) -> Result<String> {
        self.render_with(&RenderOptions::default())
    }

    /// Renders this element and its subtree with the given options.
    ///
    /// Nothing is returned unless the whole subtree renders; the first
    /// [`Error::ContractViolation`] aborts the call.
    pub fn render_with(&self, options: &RenderOptions) -> Result<String> {
        let mut out = String::new();
        render::write_element(self, &mut out, options, self.depth())?;
        Ok(out)
    }
}

/// Navigation helpers that work with ElementRef.
impl ElementInner {
    /// Returns the root of the tree containing `node`.
    pub fn root_of(node: &ElementRef) -> ElementRef {
        let mut current = Rc::clone(node);
        loop {
            let parent = current.borrow().parent();
            match parent {
                Some(p) => current = p,
                None => return current,
            }
        }
    }

    /// Returns the ancestors of `node`, nearest first.
    pub fn ancestors_of(node: &ElementRef) -> Vec<ElementRef> {
        let mut ancestors = Vec::new();
        let mut current = node.borrow().parent();
        while let Some(p) = current {
            current = p.borrow().parent();
            ancestors.push(p);
        }
        ancestors
    }

    /// Returns true if `ancestor` is `node` itself or lies on its parent chain.
    pub fn is_ancestor_or_self(ancestor: &ElementRef, node: &ElementRef) -> bool {
        if Rc::ptr_eq(ancestor, node) {
            return true;
        }
        Self::ancestors_of(node)
            .iter()
            .any(|a| Rc::ptr_eq(a, ancestor))
    }
}

/// Structural operations. These are the only way to change the child
/// collection of an element.
impl ElementInner {
    /// Appends `child` at the end of its schema slot in `parent`.
    ///
    /// Same-type siblings keep their insertion order.
    pub fn append_child(parent_ref: &ElementRef, child_ref: ElementRef) -> Result<()> {
        Self::ensure_detached(&child_ref)?;
        let index = Self::plan_insert(parent_ref, &child_ref, None)?;
        Self::attach(parent_ref, index, child_ref);
        Ok(())
    }

    /// Inserts `child` at `index` in `parent`.
    ///
    /// The index must fall inside the range occupied by the child's schema
    /// slot, so the child collection stays in render order.
    pub fn insert_child(parent_ref: &ElementRef, index: usize, child_ref: ElementRef) -> Result<()> {
        Self::ensure_detached(&child_ref)?;
        let index = Self::plan_insert(parent_ref, &child_ref, Some(index))?;
        Self::attach(parent_ref, index, child_ref);
        Ok(())
    }

    /// Removes and returns the child at `index`, clearing its parent link.
    pub fn remove_child(parent_ref: &ElementRef, index: usize) -> Result<ElementRef> {
        let count = parent_ref.borrow().children.len();
        if index >= count {
            return Err(Error::structural(format!(
                "child index {} out of range for <{}> with {} children",
                index,
                parent_ref.borrow().element_type().name(),
                count
            )));
        }
        Ok(Self::take_child(parent_ref, index))
    }

    /// Detaches `child` from its parent, returning the former parent.
    pub fn detach(child_ref: &ElementRef) -> Option<ElementRef> {
        let parent_ref = child_ref.borrow().parent()?;
        let index = Self::index_in_parent(&parent_ref, child_ref)?;
        Self::take_child(&parent_ref, index);
        Some(parent_ref)
    }

    /// Moves `child` to the end of its slot in `new_parent`.
    ///
    /// The move is validated against the new parent before the child is
    /// detached, so a refused move leaves both parents unchanged.
    pub fn move_child(child_ref: &ElementRef, new_parent_ref: &ElementRef) -> Result<()> {
        let index = Self::plan_insert(new_parent_ref, child_ref, None)?;
        Self::detach(child_ref);
        Self::attach(new_parent_ref, index, Rc::clone(child_ref));
        Ok(())
    }

    /// Moves `child` to `index` in `new_parent`.
    ///
    /// The index is interpreted against the new parent's children without
    /// `child` in them.
    pub fn move_child_at(
        child_ref: &ElementRef,
        new_parent_ref: &ElementRef,
        index: usize,
    ) -> Result<()> {
        let index = Self::plan_insert(new_parent_ref, child_ref, Some(index))?;
        Self::detach(child_ref);
        Self::attach(new_parent_ref, index, Rc::clone(child_ref));
        Ok(())
    }

    fn ensure_detached(child_ref: &ElementRef) -> Result<()> {
        let child = child_ref.borrow();
        match child.parent() {
            Some(parent) => Err(Error::structural(format!(
                "<{}> already belongs to <{}>; detach or move it instead",
                child.element_type().name(),
                parent.borrow().element_type().name()
            ))),
            None => Ok(()),
        }
    }

    /// Validates inserting `child` into `parent` and returns the final index.
    ///
    /// If `child` is already one of `parent`'s children it is left out of
    /// the calculation, which is what a move within the same parent needs.
    fn plan_insert(
        parent_ref: &ElementRef,
        child_ref: &ElementRef,
        index: Option<usize>,
    ) -> Result<usize> {
        let child_type = child_ref.borrow().element_type();
        let parent_type = parent_ref.borrow().element_type();

        if Self::is_ancestor_or_self(child_ref, parent_ref) {
            return Err(Error::structural(format!(
                "inserting <{}> into <{}> would create a cycle",
                child_type.name(),
                parent_type.name()
            )));
        }

        let slot = parent_type.slot_of(child_type).ok_or_else(|| {
            Error::structural(format!(
                "<{}> cannot contain <{}>",
                parent_type.name(),
                child_type.name()
            ))
        })?;

        let parent = parent_ref.borrow();
        let siblings: Vec<usize> = parent
            .children
            .iter()
            .filter(|c| !Rc::ptr_eq(c, child_ref))
            .map(|c| {
                parent_type
                    .slot_of(c.borrow().element_type())
                    .map_or(usize::MAX, |s| s.index)
            })
            .collect();

        let start = siblings.iter().filter(|&&s| s < slot.index).count();
        let end = siblings.iter().filter(|&&s| s <= slot.index).count();

        if slot.single && end > start {
            return Err(Error::structural(format!(
                "<{}> already has a <{}>",
                parent_type.name(),
                child_type.name()
            )));
        }

        match index {
            None => Ok(end),
            Some(i) if (start..=end).contains(&i) => Ok(i),
            Some(i) => Err(Error::structural(format!(
                "index {} is outside the <{}> range {}..={} of <{}>",
                i,
                child_type.name(),
                start,
                end,
                parent_type.name()
            ))),
        }
    }

    fn attach(parent_ref: &ElementRef, index: usize, child_ref: ElementRef) {
        child_ref.borrow_mut().set_parent(Some(parent_ref));
        let mut parent = parent_ref.borrow_mut();
        debug!(
            "attaching <{}> to <{}> at {}",
            child_ref.borrow().element_type().name(),
            parent.element_type().name(),
            index
        );
        parent.children.insert(index, child_ref);
        parent.renumber_from(index);
    }

    fn take_child(parent_ref: &ElementRef, index: usize) -> ElementRef {
        let mut parent = parent_ref.borrow_mut();
        let child_ref = parent.children.remove(index);
        parent.renumber_from(index);
        {
            let mut child = child_ref.borrow_mut();
            debug!(
                "detaching <{}> from <{}> at {}",
                child.element_type().name(),
                parent.element_type().name(),
                index
            );
            child.set_parent(None);
            child.child_pos = -1;
        }
        child_ref
    }

    fn index_in_parent(parent_ref: &ElementRef, child_ref: &ElementRef) -> Option<usize> {
        let parent = parent_ref.borrow();
        let pos = child_ref.borrow().child_pos;
        if pos >= 0 {
            if let Some(c) = parent.children.get(pos as usize) {
                if Rc::ptr_eq(c, child_ref) {
                    return Some(pos as usize);
                }
            }
        }
        parent.children.iter().position(|c| Rc::ptr_eq(c, child_ref))
    }

    fn renumber_from(&mut self, index: usize) {
        for i in index..self.children.len() {
            self.children[i].borrow_mut().child_pos = i as i32;
        }
    }
}
