/// Usage examples printed by `pyfetch HELP`.
pub const EXAMPLES: &str = r#"Examples:
  Plain GET request:
    pyfetch GET https://httpbin.org/get

  Download a large file with progress (shown above 5 MiB):
    pyfetch GET https://example.com/large-file.zip --progress

  Log request, retries and response details to stderr:
    pyfetch GET https://httpbin.org/get --verbose

  Send a custom header:
    pyfetch GET https://httpbin.org/headers -H "Authorization: Bearer your_token_here"

  POST a JSON body (Content-Type defaults to application/json):
    pyfetch POST https://httpbin.org/post -d '{"key": "value"}'

  Replace a resource:
    pyfetch PUT https://httpbin.org/put -d '{"name": "New Name"}'

  Partially update a resource:
    pyfetch PATCH https://httpbin.org/patch -d '{"email": "user@example.com"}'

  Delete a resource:
    pyfetch DELETE https://httpbin.org/delete

  Fetch headers only:
    pyfetch HEAD https://httpbin.org/get

  Ask which methods a resource allows:
    pyfetch OPTIONS https://httpbin.org/get

  Fail fast with a short timeout and no retries:
    pyfetch GET https://httpbin.org/delay/10 --timeout 2 --retries 0

Exit codes:
  0    response received (any HTTP status)
  1    request failed for another reason
  2    invalid arguments
  3    could not connect after all retries
  4    timed out after all retries
  130  interrupted by Ctrl-C
"#;
