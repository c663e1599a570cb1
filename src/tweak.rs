//! Debug panel for live tuning.
//!
//! The panel is a list of folders with bindings to named parameters, drawn as
//! an egui window over the logo. `F1` shows or hides it. Widgets only report
//! the new value of a binding; it is applied to [`LogoParams`], which answers
//! with the [`Effect`] the scene has to carry out.

use std::collections::HashMap;

use crate::{
    background::{BACKGROUNDS, BackgroundImage, BackgroundParams},
    color::Rgb,
    material::GlassParams,
    postprocess::{BloomParams, OutlineParams, PassSetting},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Background,
    CustomImageHref,
    GlassColor,
    Roughness,
    Transmission,
    Opacity,
    Transparent,
    Thickness,
    EnvMapIntensity,
    Clearcoat,
    ClearcoatRoughness,
    Metalness,
    OutlineColor,
    EdgeStrength,
    EdgeGlow,
    EdgeThickness,
    BloomStrength,
    BloomRadius,
    BloomThreshold,
    LightMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Slider { min: f32, max: f32 },
    Toggle,
    Color,
    Choice(Vec<&'static str>),
    /// Edited as a draft, applied on enter or with the button next to it.
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f32),
    Bool(bool),
    Color(Rgb),
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{:.3}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Color(c) => write!(f, "{}", c),
            Value::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub key: ParamKey,
    pub label: &'static str,
    pub control: Control,
}

impl Binding {
    fn slider(key: ParamKey, label: &'static str, min: f32, max: f32) -> Self {
        Self {
            key,
            label,
            control: Control::Slider { min, max },
        }
    }

    fn new(key: ParamKey, label: &'static str, control: Control) -> Self {
        Self { key, label, control }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub title: &'static str,
    pub bindings: Vec<Binding>,
}

/// What the scene has to do after a parameter changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    RebuildMaterial,
    ReloadBackground,
    ConfigurePass(PassSetting),
    SetLightMode(bool),
}

/// Every parameter the panel can reach.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogoParams {
    pub glass: GlassParams,
    pub outline: OutlineParams,
    pub bloom: BloomParams,
    pub background: BackgroundParams,
    pub light_mode: bool,
}

impl LogoParams {
    pub fn get(&self, key: ParamKey) -> Value {
        use ParamKey::*;
        match key {
            Background => Value::Text(self.background.background.clone()),
            CustomImageHref => Value::Text(self.background.custom_image_href.clone()),
            GlassColor => Value::Color(self.glass.color),
            Roughness => Value::Number(self.glass.roughness),
            Transmission => Value::Number(self.glass.transmission),
            Opacity => Value::Number(self.glass.opacity),
            Transparent => Value::Bool(self.glass.transparent),
            Thickness => Value::Number(self.glass.thickness),
            EnvMapIntensity => Value::Number(self.glass.env_map_intensity),
            Clearcoat => Value::Number(self.glass.clearcoat),
            ClearcoatRoughness => Value::Number(self.glass.clearcoat_roughness),
            Metalness => Value::Number(self.glass.metalness),
            OutlineColor => Value::Color(self.outline.visible_edge_color),
            EdgeStrength => Value::Number(self.outline.edge_strength),
            EdgeGlow => Value::Number(self.outline.edge_glow),
            EdgeThickness => Value::Number(self.outline.edge_thickness),
            BloomStrength => Value::Number(self.bloom.strength),
            BloomRadius => Value::Number(self.bloom.radius),
            BloomThreshold => Value::Number(self.bloom.threshold),
            LightMode => Value::Bool(self.light_mode),
        }
    }

    /// Store `value` under `key`; a value of the wrong kind is ignored.
    pub fn set(&mut self, key: ParamKey, value: Value) -> Effect {
        use ParamKey::*;
        let glass = |field: &mut f32, v: f32| {
            *field = v;
            Effect::RebuildMaterial
        };
        match (key, value) {
            (Background, Value::Text(name)) => {
                if BackgroundImage::find(&name).is_none() {
                    log::warn!("Ignoring unknown background {}", name);
                    return Effect::None;
                }
                self.background.background = name;
                Effect::ReloadBackground
            }
            (CustomImageHref, Value::Text(href)) => {
                self.background.custom_image_href = href;
                if self.background.selected().name == "custom" {
                    Effect::ReloadBackground
                } else {
                    Effect::None
                }
            }
            (GlassColor, Value::Color(c)) => {
                self.glass.color = c;
                Effect::RebuildMaterial
            }
            (Roughness, Value::Number(n)) => glass(&mut self.glass.roughness, n),
            (Transmission, Value::Number(n)) => glass(&mut self.glass.transmission, n),
            (Opacity, Value::Number(n)) => glass(&mut self.glass.opacity, n),
            (Transparent, Value::Bool(b)) => {
                self.glass.transparent = b;
                Effect::RebuildMaterial
            }
            (Thickness, Value::Number(n)) => glass(&mut self.glass.thickness, n),
            (EnvMapIntensity, Value::Number(n)) => glass(&mut self.glass.env_map_intensity, n),
            (Clearcoat, Value::Number(n)) => glass(&mut self.glass.clearcoat, n),
            (ClearcoatRoughness, Value::Number(n)) => {
                glass(&mut self.glass.clearcoat_roughness, n)
            }
            (Metalness, Value::Number(n)) => glass(&mut self.glass.metalness, n),
            (OutlineColor, Value::Color(c)) => {
                self.outline.visible_edge_color = c;
                Effect::ConfigurePass(PassSetting::Outline(self.outline.clone()))
            }
            (EdgeStrength, Value::Number(n)) => {
                self.outline.edge_strength = n;
                Effect::ConfigurePass(PassSetting::Outline(self.outline.clone()))
            }
            (EdgeGlow, Value::Number(n)) => {
                self.outline.edge_glow = n;
                Effect::ConfigurePass(PassSetting::Outline(self.outline.clone()))
            }
            (EdgeThickness, Value::Number(n)) => {
                self.outline.edge_thickness = n;
                Effect::ConfigurePass(PassSetting::Outline(self.outline.clone()))
            }
            (BloomStrength, Value::Number(n)) => {
                self.bloom.strength = n;
                Effect::ConfigurePass(PassSetting::Bloom(self.bloom.clone()))
            }
            (BloomRadius, Value::Number(n)) => {
                self.bloom.radius = n;
                Effect::ConfigurePass(PassSetting::Bloom(self.bloom.clone()))
            }
            (BloomThreshold, Value::Number(n)) => {
                self.bloom.threshold = n;
                Effect::ConfigurePass(PassSetting::Bloom(self.bloom.clone()))
            }
            (LightMode, Value::Bool(b)) => {
                self.light_mode = b;
                Effect::SetLightMode(b)
            }
            (key, value) => {
                log::warn!("{:?} cannot hold {:?}", key, value);
                Effect::None
            }
        }
    }
}

/// The debug panel: folders of bindings plus the drafts of text bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    pub title: &'static str,
    pub folders: Vec<Folder>,
    pub visible: bool,
    drafts: HashMap<ParamKey, String>,
}

impl Pane {
    pub fn new(visible: bool) -> Self {
        use ParamKey::*;
        let folders = vec![
            Folder {
                title: "Background",
                bindings: vec![
                    Binding::new(
                        Background,
                        "background",
                        Control::Choice(BACKGROUNDS.iter().map(|image| image.name).collect()),
                    ),
                    Binding::new(CustomImageHref, "customImageHref", Control::Text),
                ],
            },
            Folder {
                title: "Frosted Glass Material",
                bindings: vec![
                    Binding::new(GlassColor, "color", Control::Color),
                    Binding::slider(Roughness, "roughness", 0.0, 1.0),
                    Binding::slider(Transmission, "transmission", 0.0, 1.0),
                    Binding::slider(Opacity, "opacity", 0.0, 1.0),
                    Binding::new(Transparent, "transparent", Control::Toggle),
                    Binding::slider(Thickness, "thickness", 0.0, 1.0),
                    Binding::slider(EnvMapIntensity, "envMapIntensity", 0.0, 1.0),
                    Binding::slider(Clearcoat, "clearcoat", 0.0, 1.0),
                    Binding::slider(ClearcoatRoughness, "clearcoatRoughness", 0.0, 1.0),
                    Binding::slider(Metalness, "metalness", 0.0, 1.0),
                ],
            },
            Folder {
                title: "Model Outline",
                bindings: vec![
                    Binding::new(OutlineColor, "outlineColor", Control::Color),
                    Binding::slider(EdgeStrength, "edgeStrength", 0.0, 5.0),
                    Binding::slider(EdgeGlow, "edgeGlow", 0.0, 25.0),
                    Binding::slider(EdgeThickness, "edgeThickness", 0.1, 1.0),
                ],
            },
            Folder {
                title: "Bloom",
                bindings: vec![
                    Binding::slider(BloomStrength, "strength", 0.0, 3.0),
                    Binding::slider(BloomRadius, "radius", 0.0, 1.0),
                    Binding::slider(BloomThreshold, "threshold", 0.0, 1.0),
                ],
            },
            Folder {
                title: "Site",
                bindings: vec![Binding::new(LightMode, "lightMode", Control::Toggle)],
            },
        ];
        Self {
            title: "Dev Settings",
            folders,
            visible,
            drafts: HashMap::new(),
        }
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.folders.iter().flat_map(|folder| folder.bindings.iter())
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::debug!("{} {}", self.title, if self.visible { "shown" } else { "hidden" });
    }

    /// The edit buffer of a text binding, seeded from `params` on first use.
    pub fn draft_mut(&mut self, key: ParamKey, params: &LogoParams) -> &mut String {
        self.drafts
            .entry(key)
            .or_insert_with(|| params.get(key).to_string())
    }

    /// The change a text binding asks for once its draft is applied.
    ///
    /// Nothing is returned when the draft equals the current value.
    pub fn commit(&mut self, key: ParamKey, params: &LogoParams) -> Option<(ParamKey, Value)> {
        let draft = self.drafts.get(&key)?.trim().to_string();
        match params.get(key) {
            Value::Text(current) if current == draft => None,
            _ => Some((key, Value::Text(draft))),
        }
    }

    /// Draw the panel and collect the changes made in this frame.
    pub fn show(&mut self, ctx: &egui::Context, params: &LogoParams) -> Vec<(ParamKey, Value)> {
        let mut changes = Vec::new();
        if !self.visible {
            return changes;
        }
        let folders = self.folders.clone();
        egui::Window::new(self.title)
            .default_pos(egui::pos2(8.0, 8.0))
            .resizable(false)
            .show(ctx, |ui| {
                for folder in &folders {
                    egui::CollapsingHeader::new(folder.title)
                        .default_open(true)
                        .show(ui, |ui| {
                            for binding in &folder.bindings {
                                if let Some(change) = self.binding_ui(ui, binding, params) {
                                    changes.push(change);
                                }
                            }
                        });
                }
            });
        changes
    }

    fn binding_ui(
        &mut self,
        ui: &mut egui::Ui,
        binding: &Binding,
        params: &LogoParams,
    ) -> Option<(ParamKey, Value)> {
        let key = binding.key;
        let value = match (&binding.control, params.get(key)) {
            (Control::Slider { min, max }, Value::Number(mut n)) => ui
                .add(egui::Slider::new(&mut n, *min..=*max).text(binding.label))
                .changed()
                .then_some(Value::Number(n)),
            (Control::Toggle, Value::Bool(mut b)) => ui
                .checkbox(&mut b, binding.label)
                .changed()
                .then_some(Value::Bool(b)),
            (Control::Color, Value::Color(c)) => {
                let mut srgb = [c.r, c.g, c.b];
                ui.horizontal(|ui| {
                    let changed = ui.color_edit_button_srgb(&mut srgb).changed();
                    ui.label(binding.label);
                    changed
                })
                .inner
                .then(|| {
                    Value::Color(Rgb {
                        r: srgb[0],
                        g: srgb[1],
                        b: srgb[2],
                    })
                })
            }
            (Control::Choice(options), Value::Text(current)) => {
                let mut selected = current.clone();
                egui::ComboBox::from_label(binding.label)
                    .selected_text(selected.as_str())
                    .show_ui(ui, |ui| {
                        for option in options {
                            ui.selectable_value(&mut selected, option.to_string(), *option);
                        }
                    });
                (selected != current).then_some(Value::Text(selected))
            }
            (Control::Text, Value::Text(_)) => {
                let apply = ui
                    .horizontal(|ui| {
                        ui.label(binding.label);
                        let response = ui.text_edit_singleline(self.draft_mut(key, params));
                        let entered = response.lost_focus()
                            && ui.input(|input| input.key_pressed(egui::Key::Enter));
                        ui.button("Reload").clicked() || entered
                    })
                    .inner;
                return if apply { self.commit(key, params) } else { None };
            }
            (control, value) => {
                log::warn!("{:?} cannot show {:?}", control, value);
                None
            }
        }?;
        log::info!("[{}] {} -> {}", self.title, binding.label, value);
        Some((key, value))
    }
}
