// src/edgar/client.rs
use crate::edgar::models::{CompanySubmissions, FilingInfo, TickerEntry};
use crate::utils::error::EdgarError;
use reqwest::header;
use std::collections::HashMap;
use std::time::Duration;

// SEC fair-access policy requires a descriptive User-Agent carrying a
// contact address; set your own before running against EDGAR.
const EDGAR_USER_AGENT: &str = "filing_extractor/0.1 research-contact@example.com";
// SEC allows at most 10 requests/second; stay well under it.
const EDGAR_REQUEST_DELAY_MS: u64 = 150;

fn build_edgar_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(EDGAR_USER_AGENT)
        .build()
}

async fn throttled_get(url: &str) -> Result<reqwest::Response, EdgarError> {
    let client = build_edgar_client()?;
    tokio::time::sleep(Duration::from_millis(EDGAR_REQUEST_DELAY_MS)).await;

    let response = client
        .get(url)
        .header(header::ACCEPT, "application/json,text/html,text/plain,*/*")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
            return Err(EdgarError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EdgarError::FilingNotFound(url.to_string()));
        }
        return Err(EdgarError::Http(status));
    }

    Ok(response)
}

/// Downloads a full-submission container file as text.
pub async fn download_container(url: &str) -> Result<String, EdgarError> {
    tracing::info!("Downloading filing container from: {}", url);
    let body = throttled_get(url).await?.text().await?;
    tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
    Ok(body)
}

/// Resolves a ticker symbol to its zero-padded 10-digit CIK.
pub async fn get_cik_from_ticker(ticker: &str) -> Result<String, EdgarError> {
    let wanted = ticker.to_uppercase();
    let url = "https://www.sec.gov/files/company_tickers.json";

    let entries: HashMap<String, TickerEntry> = throttled_get(url).await?.json().await?;

    entries
        .values()
        .find(|entry| entry.ticker.eq_ignore_ascii_case(&wanted))
        .map(|entry| format!("{:010}", entry.cik_str))
        .ok_or_else(|| EdgarError::Parse(format!("Could not find CIK for ticker {}", wanted)))
}

/// Fetches the submissions index for a zero-padded CIK.
pub async fn get_company_submissions(cik: &str) -> Result<CompanySubmissions, EdgarError> {
    let url = format!("https://data.sec.gov/submissions/CIK{}.json", cik);
    Ok(throttled_get(&url).await?.json().await?)
}

/// Finds filings of the given form type for a ticker, optionally limited
/// to a year range, newest first.
pub async fn find_filings(
    ticker: &str,
    form_type: &str,
    start_year: Option<u32>,
    end_year: Option<u32>,
) -> Result<Vec<FilingInfo>, EdgarError> {
    let cik = get_cik_from_ticker(ticker).await?;
    let submissions = get_company_submissions(&cik).await?;
    let recent = &submissions.filings.recent;

    let mut filings = Vec::new();
    for (i, form) in recent.form.iter().enumerate() {
        if form != form_type {
            continue;
        }

        let accession = recent
            .accession_number
            .get(i)
            .ok_or_else(|| EdgarError::Parse("Missing accession number".to_string()))?;
        let filing_date = recent
            .filing_date
            .get(i)
            .ok_or_else(|| EdgarError::Parse("Missing filing date".to_string()))?;

        // Filing dates come as YYYY-MM-DD.
        let year = filing_date
            .get(0..4)
            .and_then(|y| y.parse::<u32>().ok())
            .ok_or_else(|| EdgarError::Parse(format!("Invalid filing date '{}'", filing_date)))?;

        if start_year.is_some_and(|y| year < y) || end_year.is_some_and(|y| year > y) {
            continue;
        }

        filings.push(FilingInfo {
            accession_number: accession.clone(),
            filing_date: filing_date.clone(),
            form_type: form.clone(),
            ticker: ticker.to_uppercase(),
            company_name: submissions.name.clone(),
            cik: cik.clone(),
            year: Some(year),
        });
    }

    filings.sort_by(|a, b| b.year.cmp(&a.year));
    Ok(filings)
}
