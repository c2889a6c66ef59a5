use crate::core::elements::{Element, HoverSkin};
use crate::renderer::instance::{ElementInstance, InstanceBuffer};

/// Flatten element transforms into the instance buffer, in store order.
pub fn build_instance_buffer<'a>(elements: impl Iterator<Item = &'a Element>, buffer: &mut InstanceBuffer) {
    buffer.clear();

    for element in elements {
        let mut flags = 0;
        if element.skin == HoverSkin::HoverActive {
            flags |= ElementInstance::FLAG_HOVER;
        }
        if element.hidden {
            flags |= ElementInstance::FLAG_HIDDEN;
        }

        let t = &element.transform;
        buffer.push(ElementInstance {
            id: element.id.0 as f32,
            x: t.x,
            y: t.y,
            x_percent: t.x_percent,
            y_percent: t.y_percent,
            scale: t.scale,
            opacity: t.opacity,
            flags: flags as f32,
        });
    }
}
