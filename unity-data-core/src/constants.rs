//! Unity class identifiers
//!
//! Class ids are the persistent type ids stored in a serialized file's object
//! table. Only the table below is known statically; scripted types all share
//! `MonoBehaviour`.

/// Common Unity class IDs
pub mod class_ids {
    pub const OBJECT: i32 = 0;
    pub const GAME_OBJECT: i32 = 1;
    pub const COMPONENT: i32 = 2;
    pub const TRANSFORM: i32 = 4;
    pub const CAMERA: i32 = 20;
    pub const MATERIAL: i32 = 21;
    pub const MESH_RENDERER: i32 = 23;
    pub const TEXTURE: i32 = 27;
    pub const TEXTURE_2D: i32 = 28;
    pub const MESH_FILTER: i32 = 33;
    pub const MESH: i32 = 43;
    pub const SHADER: i32 = 48;
    pub const TEXT_ASSET: i32 = 49;
    pub const ANIMATION_CLIP: i32 = 74;
    pub const AUDIO_CLIP: i32 = 83;
    pub const ANIMATOR_CONTROLLER: i32 = 91;
    pub const MONO_BEHAVIOUR: i32 = 114;
    pub const MONO_SCRIPT: i32 = 115;
    pub const FONT: i32 = 128;
    pub const ASSET_BUNDLE: i32 = 142;
    pub const PRELOAD_DATA: i32 = 150;
    pub const RENDER_TEXTURE: i32 = 184;
    pub const SPRITE: i32 = 213;
}

/// Class id / name pairs, sorted by id
const CLASS_TABLE: &[(i32, &str)] = &[
    (0, "Object"),
    (1, "GameObject"),
    (2, "Component"),
    (4, "Transform"),
    (8, "Behaviour"),
    (20, "Camera"),
    (21, "Material"),
    (23, "MeshRenderer"),
    (25, "Renderer"),
    (27, "Texture"),
    (28, "Texture2D"),
    (33, "MeshFilter"),
    (43, "Mesh"),
    (48, "Shader"),
    (49, "TextAsset"),
    (54, "Rigidbody"),
    (65, "BoxCollider"),
    (74, "AnimationClip"),
    (82, "AudioSource"),
    (83, "AudioClip"),
    (89, "CubemapArray"),
    (90, "Avatar"),
    (91, "AnimatorController"),
    (95, "Animator"),
    (108, "Light"),
    (114, "MonoBehaviour"),
    (115, "MonoScript"),
    (117, "Texture3D"),
    (128, "Font"),
    (137, "SkinnedMeshRenderer"),
    (142, "AssetBundle"),
    (150, "PreloadData"),
    (184, "RenderTexture"),
    (187, "Texture2DArray"),
    (212, "SpriteRenderer"),
    (213, "Sprite"),
    (687078895, "SpriteAtlas"),
];

/// Get Unity class name from class ID
pub fn get_class_name(class_id: i32) -> Option<&'static str> {
    CLASS_TABLE
        .binary_search_by_key(&class_id, |(id, _)| *id)
        .ok()
        .map(|i| CLASS_TABLE[i].1)
}

/// Get the class ID registered for a class name
pub fn class_id_of(class_name: &str) -> Option<i32> {
    CLASS_TABLE
        .iter()
        .find(|(_, name)| *name == class_name)
        .map(|(id, _)| *id)
}
