#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use cinegate_api::tmdb::{ClientConfig, Movie, SearchMovieRequest, TmdbApi, TmdbClient};
use cinegate_api::{ErrorKind, TmdbError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "apikey";

const FIGHT_CLUB_OVERVIEW: &str = "A ticking-time-bomb insomniac and a slippery soap salesman channel primal male aggression into a shocking new form of therapy.";

/// Starts a mock server answering every GET with `status` and `body`.
async fn mock_server(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("Content-Type", "application/json; charset=UTF-8")
                .set_body_string(body),
        )
        .mount(&server)
        .await;
    server
}

fn client_for(server: &MockServer) -> TmdbClient {
    TmdbClient::builder()
        .api_key(API_KEY)
        .base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_searching_fight_club() {
    // Arrange
    let body = format!(
        r#"{{
          "page": 1,
          "results": [
            {{
              "adult": false,
              "id": 550,
              "original_language": "en",
              "original_title": "Fight Club",
              "overview": "{FIGHT_CLUB_OVERVIEW}",
              "release_date": "1999-10-14",
              "poster_path": "/811DjJTon9gD6hZ8nCjSitaIXFQ.jpg"
            }}
          ],
          "total_pages": 1,
          "total_results": 1
        }}"#
    );
    let server = mock_server(200, &body).await;
    let client = client_for(&server);

    // Act
    let movies = client
        .search_movies(&SearchMovieRequest::new("fight club"))
        .await
        .unwrap();

    // Assert
    let expected = vec![Movie {
        id: 550,
        title: String::from("Fight Club"),
        overview: Some(String::from(FIGHT_CLUB_OVERVIEW)),
        poster_path: Some(String::from("/811DjJTon9gD6hZ8nCjSitaIXFQ.jpg")),
        release_date: Some(String::from("1999-10-14")),
    }];
    assert_eq!(movies, expected);
}

#[tokio::test]
async fn test_http_404_is_status_error() {
    // Arrange
    let server = mock_server(404, "").await;
    let client = client_for(&server);

    // Act
    let result = client
        .search_movies(&SearchMovieRequest::new("fight club"))
        .await;

    // Assert
    match result.unwrap_err() {
        TmdbError::HttpStatus {
            status,
            status_line,
            tmdb_code,
            message,
        } => {
            assert_eq!(status, 404);
            assert_eq!(status_line, "404 Not Found");
            assert!(tmdb_code.is_none());
            assert!(message.is_none());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_zero_results_is_not_found() {
    // Arrange
    let body = r#"{ "page": 1, "results": [], "total_pages": 1, "total_results": 0 }"#;
    let server = mock_server(200, body).await;
    let client = client_for(&server);

    // Act
    let result = client
        .search_movies(&SearchMovieRequest::new("fight club"))
        .await;

    // Assert
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_missing_query_is_validation_error() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server);

    // Act
    let result = client.search_movies(&SearchMovieRequest::new("")).await;

    // Assert
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
}

#[test]
fn test_missing_api_key_is_configuration_error() {
    // Arrange & Act
    let result = TmdbClient::builder().build();

    // Assert
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_client_from_config_struct() {
    // Arrange
    let server = MockServer::start().await;
    let json_body = include_str!("../../../fixtures/tmdb/search_movie_fight_club.json");
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("api_key", "from-config"))
        .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
        .expect(1)
        .mount(&server)
        .await;
    let config = ClientConfig {
        api_key: String::from("from-config"),
        base_url: Some(server.uri()),
        ..ClientConfig::default()
    };

    // Act
    let client = TmdbClient::builder().config(config).build().unwrap();
    let movies = client
        .search_movies(&SearchMovieRequest::new("fight club"))
        .await
        .unwrap();

    // Assert
    assert_eq!(movies[0].id, 550);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_rate_limit() {
    // Arrange
    let json_body = include_str!("../../../fixtures/tmdb/search_movie_fight_club.json");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
        .expect(6)
        .mount(&server)
        .await;
    let client = Arc::new(
        TmdbClient::builder()
            .api_key(API_KEY)
            .base_url(server.uri())
            .requests_per_second(4)
            .build()
            .unwrap(),
    );
    let start = Instant::now();

    // Act
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .search_movies(&SearchMovieRequest::new("fight club"))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Assert: burst of 4, then two more refills at 250ms each
    assert!(start.elapsed() >= Duration::from_millis(450));
    assert!(client.rate_limiter().available() <= 4);
}

#[tokio::test]
async fn test_result_with_null_title_does_not_fail_search() {
    // Arrange
    let body = r#"{
      "page": 1,
      "results": [
        { "id": 1, "original_title": null, "overview": null },
        { "id": 550, "original_title": "Fight Club" }
      ],
      "total_pages": 1,
      "total_results": 2
    }"#;
    let server = mock_server(200, body).await;
    let client = client_for(&server);

    // Act
    let movies = client
        .search_movies(&SearchMovieRequest::new("fight club"))
        .await
        .unwrap();

    // Assert
    assert_eq!(movies.len(), 2);
    assert!(movies[0].title.is_empty());
    assert_eq!(movies[1].id, 550);
}
