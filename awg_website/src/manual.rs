/*!

This is the long-form manual for `awg_website` and `awgweb`.

## Output format

The output is a PHP script defining five functions. Their names contain the
four digit year of the election day, so the files of several elections can be
included side by side on the website.

```php
<?php
function data_2018_get_meta() {
	return array(
		'wahlberechtigte' => 990,
		'stimmzettel' => 601,
		'davon-briefwaehler' => 0,
		'ungueltige-stimmen' => 3
	);
}

function data_2018_get_data() {
	return array(
		'klein-boden' => array(
			'poppinga-jens' => 106,
			'boettger-volker' => 26
		),
		'rethwischdorf' => array(
			'poppinga-jens' => 222,
			'boettger-volker' => 169
		),
		'gesamt' => array(
			'poppinga-jens' => 328,
			'boettger-volker' => 195
		)
	);
}

function data_2018_get_personen() {
	return array(
		'poppinga-jens' => array(
			'gruppierung' => 'cdu',
			'nachname' => 'Poppinga',
			'vorname' => 'Jens'
		),
		'boettger-volker' => array(
			'gruppierung' => 'awg',
			'nachname' => 'Böttger',
			'vorname' => 'Volker'
		)
	);
}

function data_2018_get_seats() {
	return array(
		'cdu' => 5,
		'awg' => 3
	);
}

function data_2018_get_types() {
	return array(
		'gesamt' => 'Gesamt',
		'klein-boden' => 'Klein Boden',
		'rethwischdorf' => 'Rethwischdorf'
	);
}
```

Layout rules:
- one entry per line, indented with tabs, no comma after the last entry
- numbers are not quoted
- strings use single quotes; `'` and `\` are escaped with a backslash, all
  other characters (umlauts included) are written as is
- unknown numbers of eligible voters or ballots are written as `null`, and so
  is the party of a candidate without party
- empty arrays are written `array()`

The total `gesamt` is computed from the polling stations: each candidate with
votes in any polling station appears once, in order of first appearance.
The figures of the meta block are written as given. They are not compared to
the votes.

### Keys

Keys are lower case identifiers: umlauts are transliterated (`ä` becomes
`ae`, `ß` becomes `ss`), any other sequence of characters besides `a-z` and
`0-9` becomes a dash, and leading digits and dashes as well as trailing dashes
are removed. Candidate keys are built from `<family name>, <given name>`.

## Input format

`awgweb` reads a snapshot of the results in JSON:

```json
{
  "election": {
    "date": "2018-05-06",
    "numberOfEligibleVoters": 990,
    "numberOfAllBallots": 601,
    "numberOfPostalBallots": 0,
    "numberOfInvalidBallots": 3
  },
  "pollingStations": [
    { "name": "Klein Boden", "votes": [["poppinga-jens", 106], ["boettger-volker", 26]] }
  ],
  "nominations": [
    { "familyName": "Poppinga", "givenName": "Jens", "party": "CDU" }
  ],
  "parties": [
    { "shortName": "CDU", "seats": 5 }
  ]
}
```

- `numberOfEligibleVoters` and `numberOfAllBallots` may be omitted.
- polling stations, nominations and parties accept an optional `key`. When it
  is missing, the key is derived from the name as described above.
- `party` of a nomination is optional.
- the votes are pairs of candidate key and number of votes. Every candidate
  key must belong to a nomination.

See `test_data/rethwisch_2018.json` for a complete example.

 */
