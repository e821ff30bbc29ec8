//! Horizontally scrolling backdrops (credits, skies, conveyor art).

use bevy::prelude::*;

use crate::core::{LoadScene, SceneRef};

/// Scrolls the texture window of a `Sprite` or `ImageNode` sideways.
///
/// The window is one `texture_size` wide and slides by `speed` texture
/// widths per second, so the image needs a repeating sampler.
#[derive(Component, Debug, Clone)]
pub struct TextureScroll {
    /// Texture widths per second
    pub speed: f32,
    /// Texture size in pixels
    pub texture_size: Vec2,
    /// Scene requested once after `delay_before_load` seconds
    pub scene_after: Option<SceneRef>,
    pub delay_before_load: f32,
    offset: f32,
    elapsed: f32,
    loaded: bool,
}

impl Default for TextureScroll {
    fn default() -> Self {
        Self {
            speed: 0.5,
            texture_size: Vec2::new(512.0, 512.0),
            scene_after: None,
            delay_before_load: 8.0,
            offset: 0.0,
            elapsed: 0.0,
            loaded: false,
        }
    }
}

impl TextureScroll {
    pub fn new(speed: f32, texture_size: Vec2) -> Self {
        Self {
            speed,
            texture_size,
            ..default()
        }
    }

    /// Request `scene` after `delay` seconds.
    pub fn then_load(mut self, scene: SceneRef, delay: f32) -> Self {
        self.scene_after = Some(scene);
        self.delay_before_load = delay;
        self
    }

    /// Horizontal offset in texture widths, wrapped to 0.0..1.0.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    fn window(&self) -> Rect {
        let x = self.offset * self.texture_size.x;
        Rect::new(x, 0.0, x + self.texture_size.x, self.texture_size.y)
    }
}

/// Slide texture windows and fire the delayed scene request.
pub fn scroll_textures(
    time: Res<Time>,
    mut scrollers: Query<(&mut TextureScroll, Option<&mut Sprite>, Option<&mut ImageNode>)>,
    mut load_scene: EventWriter<LoadScene>,
) {
    let dt = time.delta_secs();
    for (mut scroll, sprite, node) in scrollers.iter_mut() {
        scroll.offset = (scroll.offset + scroll.speed * dt).rem_euclid(1.0);
        let window = scroll.window();
        if let Some(mut sprite) = sprite {
            sprite.rect = Some(window);
        }
        if let Some(mut node) = node {
            node.rect = Some(window);
        }

        if scroll.loaded {
            continue;
        }
        let Some(scene) = scroll.scene_after.clone() else {
            continue;
        };
        scroll.elapsed += dt;
        if scroll.elapsed >= scroll.delay_before_load {
            scroll.loaded = true;
            info!("Scroll delay elapsed, loading scene {}", scene);
            load_scene.send(LoadScene(scene));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::ScenesPlugin;
    use crate::testing::{advance, app_with, record, recorded};

    #[test]
    fn window_slides_and_wraps() {
        let mut app = app_with(ScenesPlugin);
        let backdrop = app
            .world_mut()
            .spawn((Sprite::default(), TextureScroll::new(0.5, Vec2::new(100.0, 50.0))))
            .id();

        advance(&mut app, 1.0);
        let rect = app.world().get::<Sprite>(backdrop).unwrap().rect.unwrap();
        assert!((rect.min.x - 50.0).abs() < 1e-3);
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 50.0);

        advance(&mut app, 1.2);
        let offset = app.world().get::<TextureScroll>(backdrop).unwrap().offset();
        assert!((offset - 0.1).abs() < 1e-3, "offset {offset}");
    }

    #[test]
    fn loads_scene_once_after_delay() {
        let mut app = app_with(ScenesPlugin);
        record::<LoadScene>(&mut app);
        app.world_mut().spawn((
            ImageNode::default(),
            TextureScroll::default().then_load(SceneRef::Name("main_menu".into()), 0.45),
        ));

        advance(&mut app, 0.3);
        assert!(recorded::<LoadScene>(&app).is_empty());
        advance(&mut app, 1.0);
        assert_eq!(
            recorded::<LoadScene>(&app),
            vec![LoadScene(SceneRef::Name("main_menu".into()))]
        );
    }
}
