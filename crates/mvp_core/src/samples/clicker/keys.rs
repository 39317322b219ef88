crate::record_fields! {
    /// Fields of the nested player record.
    pub enum PlayerField {
        Gold,
        GoldPerClickLevel,
        GoldPerSecLevel,
    }
}

crate::record_fields! {
    /// Fields of the model's outer record.
    pub enum ClickerField {
        Data,
    }
}

crate::method_keys! {
    /// Intents raised by the view.
    pub enum ClickerMethod {
        ClickAddGold,
        SecAddGold,
        UpgradeGoldPerClick,
        UpgradeGoldPerSec,
    }
}

crate::method_keys! {
    /// Read-only queries. `NextGoldPerClickCost` and `NextGoldPerSecCost`
    /// return `Option<i64>`, `None` at max level; the rest return `i64`.
    pub enum ClickerQuery {
        Gold,
        GoldPerClick,
        GoldPerSec,
        GoldPerClickLevel,
        GoldPerSecLevel,
        NextGoldPerClickCost,
        NextGoldPerSecCost,
    }
}

crate::element_keys! {
    pub enum ClickerText {
        GoldPerClickText,
        GoldPerSecText,
        CurrentGoldText,
        NextGoldPerClickLevelText,
        NextGoldPerSecLevelText,
        NextGoldPerClickCostText,
        NextGoldPerSecCostText,
    }
}

crate::element_keys! {
    pub enum ClickerButton {
        GoldPerClickUpgradeButton,
        GoldPerSecUpgradeButton,
        ScreenButton,
    }
}

crate::element_keys! {
    pub enum ClickerTransform {
        Circle,
    }
}

crate::element_keys! {
    pub enum ClickerPanel {
        ClickerRoot,
    }
}
