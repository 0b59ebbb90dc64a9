//! Flat collection of ground-truth and detection annotations.

use crate::types::{Annotation, BoxRole};
use std::collections::BTreeSet;

/// All boxes of one evaluation run, ground truth and detections together.
///
/// Order of insertion is preserved; it breaks confidence ties during
/// matching. Duplicates are legal.
#[derive(Debug, Clone, Default)]
pub struct AnnotationCollection {
    annotations: Vec<Annotation>,
}

impl AnnotationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Boxes of the given class, in insertion order.
    pub fn by_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations.iter().filter(move |ann| ann.class() == class)
    }

    /// Boxes with the given role, in insertion order.
    pub fn by_role(&self, role: BoxRole) -> impl Iterator<Item = &Annotation> + '_ {
        self.annotations.iter().filter(move |ann| ann.role() == role)
    }

    /// Boxes belonging to the given image, in insertion order.
    pub fn by_image<'a>(&'a self, image: &'a str) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations.iter().filter(move |ann| ann.image() == image)
    }

    /// Count all boxes, or only those with `role`.
    pub fn count(&self, role: Option<BoxRole>) -> usize {
        match role {
            Some(role) => self.by_role(role).count(),
            None => self.annotations.len(),
        }
    }

    /// Distinct class labels across both roles, sorted.
    pub fn classes(&self) -> Vec<&str> {
        let classes: BTreeSet<&str> = self.annotations.iter().map(Annotation::class).collect();
        classes.into_iter().collect()
    }

    /// Distinct image keys, sorted.
    pub fn images(&self) -> Vec<&str> {
        let images: BTreeSet<&str> = self.annotations.iter().map(Annotation::image).collect();
        images.into_iter().collect()
    }
}

impl Extend<Annotation> for AnnotationCollection {
    fn extend<T: IntoIterator<Item = Annotation>>(&mut self, iter: T) {
        self.annotations.extend(iter);
    }
}

impl FromIterator<Annotation> for AnnotationCollection {
    fn from_iter<T: IntoIterator<Item = Annotation>>(iter: T) -> Self {
        Self {
            annotations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AnnotationCollection {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.annotations.iter()
    }
}
