use yew::prelude::*;

use crate::icons::{GlyphTable, IconResolver};
use crate::state::{NEW_TOKEN_KEY, NewTokenPayload};

pub struct Preset {
    pub name: &'static str,
    pub token_type: &'static str,
    pub icon: &'static str,
}

pub struct Category {
    pub title: &'static str,
    pub icon: &'static str,
    pub presets: &'static [Preset],
}

pub const CATEGORIES: &[Category] = &[
    Category {
        title: "Players & NPCs",
        icon: "Users",
        presets: &[
            Preset { name: "Player", token_type: "player", icon: "Shield" },
            Preset { name: "Guardian", token_type: "player", icon: "Shield" },
        ],
    },
    Category {
        title: "Monsters",
        icon: "VenetianMask",
        presets: &[
            Preset { name: "Undead", token_type: "monster", icon: "Skull" },
            Preset { name: "Spirit", token_type: "monster", icon: "Ghost" },
            Preset { name: "Beast", token_type: "monster", icon: "Flame" },
            Preset { name: "Melee", token_type: "monster", icon: "Swords" },
        ],
    },
    Category {
        title: "Items",
        icon: "ShoppingBag",
        presets: &[
            Preset { name: "Treasure", token_type: "item", icon: "Box" },
            Preset { name: "Objective", token_type: "item", icon: "Gem" },
        ],
    },
];

fn preset_tile(preset: &'static Preset) -> Html {
    let ondragstart = Callback::from(move |e: DragEvent| {
        let payload = NewTokenPayload {
            token_type: preset.token_type.to_string(),
            icon: preset.icon.to_string(),
            name: preset.name.to_string(),
        };
        if let Some(dt) = e.data_transfer() {
            let _ = dt.set_data(NEW_TOKEN_KEY, &payload.encode());
            dt.set_effect_allowed("copy");
        }
    });
    html! {
        <div draggable="true" {ondragstart} title={format!("Drag to add {}", preset.name)}
            style="display:flex; flex-direction:column; align-items:center; gap:2px; padding:6px; border:1px solid #30363d; border-radius:8px; background:#0e1116; cursor:grab; user-select:none;">
            <span style="font-size:24px;">{ GlyphTable.resolve(preset.icon).symbol() }</span>
            <span style="font-size:10px; opacity:0.8;">{ preset.name }</span>
        </div>
    }
}

#[function_component]
pub fn TokenLibrary() -> Html {
    let open = use_state(|| 0usize);

    let tabs = CATEGORIES.iter().enumerate().map(|(i, cat)| {
        let onclick = {
            let open = open.clone();
            Callback::from(move |_| open.set(i))
        };
        let style = if *open == i { "border-color:#58a6ff; color:#58a6ff;" } else { "" };
        html! {
            <button {onclick} {style} title={cat.title}>
                { GlyphTable.resolve(cat.icon).symbol() }
            </button>
        }
    });
    let category = CATEGORIES.get(*open).unwrap_or(&CATEGORIES[0]);

    html! {<div style="background:#161b22; border:1px solid #30363d; border-radius:8px; padding:10px; display:flex; flex-direction:column; gap:8px;">
        <div style="font-weight:bold;">{"Token Library"}</div>
        <div style="display:flex; gap:6px;">{ for tabs }</div>
        <div style="font-size:12px; opacity:0.8;">{ category.title }</div>
        <div style="display:grid; grid-template-columns:repeat(3, 1fr); gap:6px;">
            { for category.presets.iter().map(preset_tile) }
        </div>
        <div style="font-size:11px; opacity:0.7;">{"Drag a preset onto the map. Right-click a placed token to edit it."}</div>
    </div>}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::Glyph;
    use crate::model::TokenKind;

    #[test]
    fn every_preset_has_a_known_glyph_and_kind() {
        for cat in CATEGORIES {
            assert_ne!(GlyphTable.resolve(cat.icon), Glyph::Fallback, "{}", cat.title);
            for p in cat.presets {
                assert_ne!(GlyphTable.resolve(p.icon), Glyph::Fallback, "{}", p.name);
                assert!(!matches!(TokenKind::parse(p.token_type), TokenKind::Other(_)));
            }
        }
    }
}
