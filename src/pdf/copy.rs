//! Deep copy of objects from one document into another

use std::collections::{HashMap, HashSet};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use crate::error::Result;

/// Copies objects out of `source` into a destination document, following references
///
/// Every source object is copied at most once per copier; later references to
/// it resolve to the same destination object. References to pages of the
/// source become `null`, so copying one page never drags in the rest of the
/// page tree through annotations or destinations.
pub(crate) struct ObjectCopier<'a> {
    source: &'a Document,
    source_pages: HashSet<ObjectId>,
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    pub fn new(source: &'a Document) -> Self {
        let source_pages = source.get_pages().into_values().collect();
        Self {
            source,
            source_pages,
            copied: HashMap::new(),
        }
    }

    /// Copy the entries of a dictionary, leaving out the keys in `skip`
    pub fn copy_dictionary(
        &mut self,
        dest: &mut Document,
        dict: &Dictionary,
        skip: &[&[u8]],
    ) -> Result<Dictionary> {
        let mut new_dict = Dictionary::new();
        for (key, value) in dict.iter() {
            if skip.contains(&key.as_slice()) {
                continue;
            }
            new_dict.set(key.clone(), self.copy_object(dest, value)?);
        }
        Ok(new_dict)
    }

    pub fn copy_object(&mut self, dest: &mut Document, obj: &Object) -> Result<Object> {
        match obj {
            Object::Reference(id) => {
                if self.source_pages.contains(id) {
                    return Ok(Object::Null);
                }
                if let Some(&new_id) = self.copied.get(id) {
                    return Ok(Object::Reference(new_id));
                }

                // Reserve the destination ID first so reference cycles terminate
                let new_id = dest.new_object_id();
                self.copied.insert(*id, new_id);

                let referenced = self.source.get_object(*id)?;
                let copied = self.copy_object(dest, referenced)?;
                dest.objects.insert(new_id, copied);

                Ok(Object::Reference(new_id))
            }
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.copy_dictionary(dest, dict, &[])?)),
            Object::Array(arr) => {
                let mut new_arr = Vec::with_capacity(arr.len());
                for item in arr {
                    new_arr.push(self.copy_object(dest, item)?);
                }
                Ok(Object::Array(new_arr))
            }
            Object::Stream(stream) => {
                let new_dict = self.copy_dictionary(dest, &stream.dict, &[])?;
                Ok(Object::Stream(Stream {
                    dict: new_dict,
                    content: stream.content.clone(),
                    allows_compression: stream.allows_compression,
                    start_position: None,
                }))
            }
            _ => Ok(obj.clone()),
        }
    }
}
