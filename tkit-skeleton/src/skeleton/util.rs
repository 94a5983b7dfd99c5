//! Skeleton surgery helpers used by filters that post-process skeletons.

use super::classify::is_self_ref;
use super::Skeleton;
use crate::locale::LocaleId;

/// Index of the content self-marker, restricted to `locale` when given.
pub fn find_self_ref(skeleton: &Skeleton, locale: Option<&LocaleId>) -> Option<usize> {
    skeleton.parts().iter().position(|part| {
        is_self_ref(part)
            && match locale {
                None => true,
                Some(loc) => loc.is_empty() || part.locale.as_ref() == Some(loc),
            }
    })
}

pub fn has_self_ref(skeleton: &Skeleton, locale: Option<&LocaleId>) -> bool {
    find_self_ref(skeleton, locale).is_some()
}

/// Splits around the first self-marker, which is dropped. Without one, everything is "before".
pub fn split_at_self_ref(skeleton: &Skeleton) -> (Skeleton, Skeleton) {
    match find_self_ref(skeleton, None) {
        None => (skeleton.clone(), Skeleton::new()),
        Some(index) => {
            let parts = skeleton.parts();
            (
                Skeleton::from_parts(parts[..index].to_vec()),
                Skeleton::from_parts(parts[index + 1..].to_vec()),
            )
        }
    }
}

/// Replaces the part at `index` with all parts of `replacement`. False if out of range.
pub fn replace_part(skeleton: &mut Skeleton, index: usize, replacement: &Skeleton) -> bool {
    if index >= skeleton.len() {
        return false;
    }
    let parts = skeleton.parts_mut();
    parts.splice(index..=index, replacement.parts().iter().cloned());
    true
}

/// Moves every part owned by `from` to `to`, and the skeleton itself if `from` owned it.
pub fn change_owner(skeleton: &mut Skeleton, from: &str, to: &str) {
    if skeleton.owner() == Some(from) {
        skeleton.set_owner(to);
    }
    for part in skeleton.parts_mut() {
        if part.is_owned_by(from) {
            part.owner = Some(to.to_string());
        }
    }
}
