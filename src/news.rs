use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

/// Polarity beyond which an article counts as positive or negative
const POLARITY_THRESHOLD: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SentimentField {
    Score(f64),
    Label(String),
}

/// Item of `/api/company_news`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, alias = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(default)]
    pub sentiment: Option<SentimentField>,
    #[serde(default)]
    pub sentiment_label: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
}

impl Tone {
    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }

    fn from_polarity(polarity: f64) -> Option<Self> {
        if !polarity.is_finite() {
            None
        } else if polarity > POLARITY_THRESHOLD {
            Some(Self::Positive)
        } else if polarity < -POLARITY_THRESHOLD {
            Some(Self::Negative)
        } else {
            Some(Self::Neutral)
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::Positive => t!("Sentiment.Positive"),
            Self::Neutral => t!("Sentiment.Neutral"),
            Self::Negative => t!("Sentiment.Negative"),
        }
    }
}

impl NewsArticle {
    /// Explicit label first, then the polarity score
    pub fn tone(&self) -> Option<Tone> {
        if let Some(tone) = self.sentiment_label.as_deref().and_then(Tone::from_label) {
            return Some(tone);
        }
        match &self.sentiment {
            Some(SentimentField::Label(label)) => Tone::from_label(label),
            Some(SentimentField::Score(polarity)) => Tone::from_polarity(*polarity),
            None => None,
        }
    }

    /// Tone for the badge, unclassified articles show as neutral
    pub fn display_tone(&self) -> Tone {
        self.tone().unwrap_or(Tone::Neutral)
    }

    pub fn source_label(&self) -> String {
        self.source
            .as_deref()
            .map(str::trim)
            .filter(|source| !source.is_empty())
            .map_or_else(|| t!("News.UnknownSource"), ToString::to_string)
    }

    pub fn published_date(&self) -> Option<Date> {
        let raw = self.published_at.as_deref()?.trim();
        Date::parse(raw.get(..10)?, format_description!("[year]-[month]-[day]")).ok()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NewsFilter {
    #[default]
    All,
    Positive,
    Neutral,
    Negative,
}

impl NewsFilter {
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Positive,
            Self::Positive => Self::Neutral,
            Self::Neutral => Self::Negative,
            Self::Negative => Self::All,
        }
    }

    pub fn matches(self, article: &NewsArticle) -> bool {
        let tone = article.tone();
        match self {
            Self::All => true,
            Self::Positive => tone == Some(Tone::Positive),
            Self::Neutral => tone == Some(Tone::Neutral),
            Self::Negative => tone == Some(Tone::Negative),
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::All => t!("News.Filter.All"),
            Self::Positive => t!("Sentiment.Positive"),
            Self::Neutral => t!("Sentiment.Neutral"),
            Self::Negative => t!("Sentiment.Negative"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum FeedStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Articles for the main ticker plus the active filter
#[derive(Clone, Debug, Default)]
pub struct NewsFeed {
    articles: Vec<NewsArticle>,
    filter: NewsFilter,
    status: FeedStatus,
}

impl NewsFeed {
    pub fn begin(&mut self) {
        self.articles.clear();
        self.status = FeedStatus::Loading;
    }

    /// Replace the articles, the current filter stays
    pub fn replace(&mut self, articles: Vec<NewsArticle>) {
        self.articles = articles;
        self.status = FeedStatus::Ready;
    }

    pub fn fail(&mut self, reason: String) {
        self.articles.clear();
        self.status = FeedStatus::Failed(reason);
    }

    pub fn cycle_filter(&mut self) -> NewsFilter {
        self.filter = self.filter.next();
        self.filter
    }

    pub fn filter(&self) -> NewsFilter {
        self.filter
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn total(&self) -> usize {
        self.articles.len()
    }

    pub fn visible(&self) -> impl Iterator<Item = &NewsArticle> {
        let filter = self.filter;
        self.articles.iter().filter(move |article| filter.matches(article))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn article(title: &str, sentiment: Option<SentimentField>, label: Option<&str>) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            sentiment,
            sentiment_label: label.map(ToString::to_string),
            ..NewsArticle::default()
        }
    }

    fn feed() -> NewsFeed {
        let mut feed = NewsFeed::default();
        feed.replace(vec![
            article("up", Some(SentimentField::Score(0.4)), None),
            article("down", Some(SentimentField::Score(-0.3)), None),
            article("flat", Some(SentimentField::Score(0.05)), None),
            article("labelled", Some(SentimentField::Score(0.9)), Some("negative")),
            article("text", Some(SentimentField::Label("Positive".into())), None),
            article("unknown", None, None),
        ]);
        feed
    }

    fn titles(feed: &NewsFeed) -> Vec<&str> {
        feed.visible().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn classification() {
        assert_eq!(article("", Some(SentimentField::Score(0.1)), None).tone(), Some(Tone::Neutral));
        assert_eq!(article("", Some(SentimentField::Score(0.11)), None).tone(), Some(Tone::Positive));
        assert_eq!(article("", Some(SentimentField::Score(-0.11)), None).tone(), Some(Tone::Negative));
        assert_eq!(article("", None, Some("weird")).tone(), None);
        assert_eq!(article("", None, None).display_tone(), Tone::Neutral);
    }

    #[test]
    fn filter_cycle() {
        let mut feed = feed();
        assert_eq!(titles(&feed).len(), 6);

        assert_eq!(feed.cycle_filter(), NewsFilter::Positive);
        assert_eq!(titles(&feed), vec!["up", "text"]);

        assert_eq!(feed.cycle_filter(), NewsFilter::Neutral);
        assert_eq!(titles(&feed), vec!["flat"]);

        assert_eq!(feed.cycle_filter(), NewsFilter::Negative);
        assert_eq!(titles(&feed), vec!["down", "labelled"]);

        assert_eq!(feed.cycle_filter(), NewsFilter::All);
    }

    #[test]
    fn filter_survives_refresh() {
        let mut feed = feed();
        feed.cycle_filter();
        feed.begin();
        assert_eq!(feed.status(), &FeedStatus::Loading);
        feed.replace(vec![article("later", Some(SentimentField::Score(0.5)), None)]);
        assert_eq!(feed.filter(), NewsFilter::Positive);
        assert_eq!(titles(&feed), vec!["later"]);
    }

    #[test]
    fn decode_wire_article() {
        let json = r#"[
            {"title": "A", "url": "https://x", "source": "Reuters", "publishedAt": "2024-03-01T12:00:00Z", "sentiment": 0.3},
            {"title": "B", "sentiment": "negative", "sentiment_label": null},
            {"title": "C", "published_at": "garbage"}
        ]"#;
        let articles: Vec<NewsArticle> = serde_json::from_str(json).unwrap();
        assert_eq!(articles[0].tone(), Some(Tone::Positive));
        assert_eq!(articles[0].published_date(), Some(date!(2024 - 03 - 01)));
        assert_eq!(articles[1].tone(), Some(Tone::Negative));
        assert_eq!(articles[2].published_date(), None);
        assert_eq!(articles[0].source_label(), "Reuters");
    }
}
