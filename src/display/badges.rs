//! Semantic tones for indicator cards and trade-signal badges.

use crate::display::format::format_price;
use crate::models::indicators::Indicators;
use crate::models::prediction::TradeSignal;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;
/// Volatility (percent) above which the volatility card is flagged.
pub const HIGH_VOLATILITY_PCT: f64 = 5.0;

/// Colour-free tone a renderer maps onto its palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Caution,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub fn from_rsi(rsi: f64) -> Self {
        if rsi > RSI_OVERBOUGHT {
            RsiZone::Overbought
        } else if rsi < RSI_OVERSOLD {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            RsiZone::Overbought => Tone::Negative,
            RsiZone::Oversold => Tone::Positive,
            RsiZone::Neutral => Tone::Caution,
        }
    }
}

impl TradeSignal {
    pub fn tone(self) -> Tone {
        match self {
            TradeSignal::StrongBuy | TradeSignal::Buy => Tone::Positive,
            TradeSignal::Sell | TradeSignal::StrongSell => Tone::Negative,
            TradeSignal::Hold | TradeSignal::Unknown => Tone::Caution,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self.tone() {
            Tone::Positive => "🟢",
            Tone::Negative => "🔴",
            _ => "🟡",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TradeSignal::StrongBuy => "Strong Buy",
            TradeSignal::Buy => "Buy",
            TradeSignal::Sell => "Sell",
            TradeSignal::StrongSell => "Strong Sell",
            TradeSignal::Hold | TradeSignal::Unknown => "Hold",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorCard {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

/// Cards for the indicator grid, in display order.
///
/// The longer moving averages are only shown when the backend sends them.
pub fn indicator_cards(indicators: &Indicators) -> Vec<IndicatorCard> {
    let mut cards = vec![
        IndicatorCard {
            label: "RSI (14)",
            value: format!("{:.1}", indicators.rsi),
            tone: RsiZone::from_rsi(indicators.rsi).tone(),
        },
        IndicatorCard {
            label: "MA-7",
            value: format!("${}", format_price(indicators.ma_7)),
            tone: Tone::Neutral,
        },
    ];

    if let Some(ma_25) = indicators.ma_25 {
        cards.push(IndicatorCard {
            label: "MA-25",
            value: format!("${}", format_price(ma_25)),
            tone: Tone::Neutral,
        });
    }
    if let Some(ma_50) = indicators.ma_50 {
        cards.push(IndicatorCard {
            label: "MA-50",
            value: format!("${}", format_price(ma_50)),
            tone: Tone::Neutral,
        });
    }

    cards.push(IndicatorCard {
        label: "Volatility",
        value: format!("{:.2}%", indicators.volatility),
        tone: if indicators.volatility > HIGH_VOLATILITY_PCT {
            Tone::Negative
        } else {
            Tone::Positive
        },
    });

    cards.push(IndicatorCard {
        label: "Trend",
        value: format_trend(indicators.trend_strength),
        tone: if indicators.trend_strength > 0.0 {
            Tone::Positive
        } else {
            Tone::Negative
        },
    });

    cards
}

/// Trend card value: one decimal, explicit plus sign.
fn format_trend(pct: f64) -> String {
    if pct > 0.0 {
        format!("+{:.1}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}
